use std::sync::Arc;

use crate::config::ServerConfig;
use crate::mailer::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; this is the only state shared across requests.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: backlot_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound email seam. Production wiring uses the logging stub; tests
    /// may substitute their own.
    pub mailer: Arc<dyn Mailer>,
}
