//! Repository for the `campaigns` table.

use sqlx::types::Json;
use sqlx::PgPool;

use backlot_core::audience::AudienceFilter;
use backlot_core::id::new_entity_id;

use crate::models::campaign::{Campaign, CAMPAIGN_EVENTS};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subject, content, filter, status, recipient_count, delivered, opened, \
                       clicked, bounced, created_by, created_at";

/// Provides CRUD operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Record a triggered campaign, returning the created row.
    pub async fn create(
        pool: &PgPool,
        subject: &str,
        content: &str,
        filter: &AudienceFilter,
        recipient_count: i32,
        created_by: &str,
    ) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns (id, subject, content, filter, status, recipient_count, created_by)
             VALUES ($1, $2, $3, $4, 'sent', $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(new_entity_id())
            .bind(subject)
            .bind(content)
            .bind(Json(filter))
            .bind(recipient_count)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List campaigns, newest first.
    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete a campaign. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add `count` to one of the webhook-populated engagement counters.
    ///
    /// `event` must be one of [`CAMPAIGN_EVENTS`]; the column name is taken
    /// from that whitelist, never from the wire. A `NULL` counter starts
    /// from zero on its first event. Returns `false` when the campaign id
    /// does not exist.
    pub async fn increment_event(
        pool: &PgPool,
        id: &str,
        event: &str,
        count: i32,
    ) -> Result<bool, sqlx::Error> {
        debug_assert!(CAMPAIGN_EVENTS.contains(&event));
        let query =
            format!("UPDATE campaigns SET {event} = COALESCE({event}, 0) + $2 WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(id)
            .bind(count)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM campaigns")
            .fetch_one(pool)
            .await
    }
}
