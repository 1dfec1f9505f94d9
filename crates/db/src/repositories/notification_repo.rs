//! Repository for the `notifications` table.
//!
//! Every query is scoped by `user_id`; there is deliberately no operation
//! that can touch another user's rows.

use sqlx::PgPool;

use backlot_core::id::new_entity_id;

use crate::models::notification::{NewNotification, Notification};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, message, kind, read, related_kind, related_id, link, created_at";

/// Provides inbox operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert one notification into a user's inbox.
    pub async fn create(
        pool: &PgPool,
        user_id: &str,
        input: &NewNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (id, user_id, message, kind, related_kind, related_id, link)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(new_entity_id())
            .bind(user_id)
            .bind(&input.message)
            .bind(&input.kind)
            .bind(&input.related_kind)
            .bind(&input.related_id)
            .bind(&input.link)
            .fetch_one(pool)
            .await
    }

    /// One page of a user's inbox, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only { "AND read = FALSE" } else { "" };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 {filter} \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total rows matching the page's filter (for pagination metadata).
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: &str,
        unread_only: bool,
    ) -> Result<i64, sqlx::Error> {
        let filter = if unread_only { "AND read = FALSE" } else { "" };
        let query = format!("SELECT COUNT(*) FROM notifications WHERE user_id = $1 {filter}");
        sqlx::query_scalar(&query).bind(user_id).fetch_one(pool).await
    }

    /// Unread count, independent of any requested page.
    pub async fn unread_count(pool: &PgPool, user_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read = FALSE",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Mark an explicit id set as read. Rows owned by other users or already
    /// read are untouched. Returns the number of rows modified.
    pub async fn mark_read(
        pool: &PgPool,
        user_id: &str,
        ids: &[String],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE \
             WHERE user_id = $1 AND read = FALSE AND id = ANY($2)",
        )
        .bind(user_id)
        .bind(ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark all of a user's unread notifications as read.
    pub async fn mark_all_read(pool: &PgPool, user_id: &str) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
