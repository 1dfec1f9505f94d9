//! Repository for the `productions` table.

use sqlx::types::Json;
use sqlx::PgPool;

use backlot_core::id::new_entity_id;

use crate::models::production::{
    CreateProduction, Production, ProductionFilter, UpdateProduction,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, slug, category, status, description, image, progress, team, \
                       stages, start_date, estimated_completion, featured, created_at, updated_at";

/// Provides CRUD operations for productions.
pub struct ProductionRepo;

impl ProductionRepo {
    /// Insert a new production, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProduction,
    ) -> Result<Production, sqlx::Error> {
        let query = format!(
            "INSERT INTO productions (id, title, slug, category, status, description, image, \
             progress, team, stages, start_date, estimated_completion, featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Production>(&query)
            .bind(new_entity_id())
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.category)
            .bind(&input.status)
            .bind(&input.description)
            .bind(&input.image)
            .bind(input.progress)
            .bind(&input.team)
            .bind(Json(&input.stages))
            .bind(&input.start_date)
            .bind(&input.estimated_completion)
            .bind(input.featured)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Production>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM productions WHERE id = $1");
        sqlx::query_as::<_, Production>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Production>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM productions WHERE slug = $1");
        sqlx::query_as::<_, Production>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether `slug` is already taken by a production other than `exclude_id`.
    pub async fn slug_in_use(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM productions WHERE slug = $1 AND ($2::TEXT IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// List productions matching the AND-combined filter, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &ProductionFilter,
    ) -> Result<Vec<Production>, sqlx::Error> {
        let mut clauses: Vec<String> = Vec::new();
        let mut text_binds: Vec<&str> = Vec::new();
        let mut idx = 1u32;

        if let Some(category) = &filter.category {
            clauses.push(format!("category = ${idx}"));
            text_binds.push(category);
            idx += 1;
        }
        if let Some(status) = &filter.status {
            clauses.push(format!("status = ${idx}"));
            text_binds.push(status);
            idx += 1;
        }
        if filter.featured.is_some() {
            clauses.push(format!("featured = ${idx}"));
            idx += 1;
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let query = format!(
            "SELECT {COLUMNS} FROM productions {where_clause} ORDER BY created_at DESC LIMIT ${idx}"
        );

        let mut q = sqlx::query_as::<_, Production>(&query);
        for bind in text_binds {
            q = q.bind(bind);
        }
        if let Some(featured) = filter.featured {
            q = q.bind(featured);
        }
        q.bind(filter.limit).fetch_all(pool).await
    }

    /// Update a production. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateProduction,
    ) -> Result<Option<Production>, sqlx::Error> {
        let query = format!(
            "UPDATE productions SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                category = COALESCE($4, category),
                status = COALESCE($5, status),
                description = COALESCE($6, description),
                image = COALESCE($7, image),
                progress = COALESCE($8, progress),
                team = COALESCE($9, team),
                stages = COALESCE($10, stages),
                start_date = COALESCE($11, start_date),
                estimated_completion = COALESCE($12, estimated_completion),
                featured = COALESCE($13, featured),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Production>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.category)
            .bind(&input.status)
            .bind(&input.description)
            .bind(&input.image)
            .bind(input.progress)
            .bind(&input.team)
            .bind(input.stages.as_ref().map(Json))
            .bind(&input.start_date)
            .bind(&input.estimated_completion)
            .bind(input.featured)
            .fetch_optional(pool)
            .await
    }

    /// Delete a production. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM productions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM productions")
            .fetch_one(pool)
            .await
    }
}
