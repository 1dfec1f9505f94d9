//! Repository for the `activity_log` table. Append-only.

use sqlx::PgPool;

use backlot_core::id::new_entity_id;

use crate::models::activity::{ActivityEntry, ActivityFilter, NewActivityEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, page_url, page_type, event, item_id, actor_id, extra, created_at";

/// Provides insert and query operations for the activity trail.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Append one entry. Callers treat failures as advisory.
    pub async fn create(
        pool: &PgPool,
        input: &NewActivityEntry,
    ) -> Result<ActivityEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_log (id, page_url, page_type, event, item_id, actor_id, extra)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(new_entity_id())
            .bind(&input.page_url)
            .bind(&input.page_type)
            .bind(&input.event)
            .bind(&input.item_id)
            .bind(&input.actor_id)
            .bind(&input.extra)
            .fetch_one(pool)
            .await
    }

    /// Recent entries matching the AND-combined filter, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &ActivityFilter,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let mut clauses: Vec<String> = Vec::new();
        let mut text_binds: Vec<&str> = Vec::new();
        let mut idx = 1u32;

        if let Some(page_type) = &filter.page_type {
            clauses.push(format!("page_type = ${idx}"));
            text_binds.push(page_type);
            idx += 1;
        }
        if let Some(event) = &filter.event {
            clauses.push(format!("event = ${idx}"));
            text_binds.push(event);
            idx += 1;
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let query = format!(
            "SELECT {COLUMNS} FROM activity_log {where_clause} \
             ORDER BY created_at DESC LIMIT ${idx}"
        );

        let mut q = sqlx::query_as::<_, ActivityEntry>(&query);
        for bind in text_binds {
            q = q.bind(bind);
        }
        q.bind(filter.limit).fetch_all(pool).await
    }
}
