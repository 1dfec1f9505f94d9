//! Persistence layer for the Backlot content platform.
//!
//! Exposes the connection pool, embedded migrations, and one repository per
//! entity. Repositories return raw `sqlx::Error`; classification into the
//! HTTP error taxonomy happens in the API crate.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Create a pool without connecting.
///
/// Used by tests that exercise routing, validation, and auth gates -- paths
/// that never reach the database. The short acquire timeout makes any
/// accidental query fail fast instead of retrying for sqlx's default 30s.
pub fn connect_lazy(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy(database_url)
}

/// Cheap liveness probe (`SELECT 1`).
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
