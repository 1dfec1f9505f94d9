//! Repository for the `subscribers` table.

use sqlx::PgPool;

use backlot_core::audience::AudienceFilter;
use backlot_core::id::new_entity_id;
use backlot_core::types::Timestamp;

use crate::models::subscriber::{Subscriber, SubscriberFilter, UpdateSubscriber};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, name, subscribed, subscribed_at, unsubscribed_at, interests, \
                       source, last_email_sent, unsubscribe_token_hash, \
                       unsubscribe_token_expires_at, created_at, updated_at";

/// Provides CRUD and lifecycle operations for subscribers.
pub struct SubscriberRepo;

impl SubscriberRepo {
    /// Insert a new subscriber (first-time opt-in), returning the created row.
    pub async fn create(
        pool: &PgPool,
        email: &str,
        name: &str,
        interests: &[String],
        source: &str,
    ) -> Result<Subscriber, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscribers (id, email, name, interests, source)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscriber>(&query)
            .bind(new_entity_id())
            .bind(email)
            .bind(name)
            .bind(interests)
            .bind(source)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Subscriber>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscribers WHERE id = $1");
        sqlx::query_as::<_, Subscriber>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find by normalized email.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Subscriber>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscribers WHERE email = $1");
        sqlx::query_as::<_, Subscriber>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Re-activate an unsubscribed record in place: refresh `subscribed_at`,
    /// clear `unsubscribed_at`, merge profile fields. No duplicate row.
    pub async fn resubscribe(
        pool: &PgPool,
        id: &str,
        name: &str,
        interests: &[String],
    ) -> Result<Option<Subscriber>, sqlx::Error> {
        let query = format!(
            "UPDATE subscribers SET
                subscribed = TRUE,
                subscribed_at = NOW(),
                unsubscribed_at = NULL,
                name = CASE WHEN $2 = '' THEN name ELSE $2 END,
                interests = CASE WHEN cardinality($3::TEXT[]) = 0 THEN interests ELSE $3 END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscriber>(&query)
            .bind(id)
            .bind(name)
            .bind(interests)
            .fetch_optional(pool)
            .await
    }

    /// Mark a subscriber unsubscribed and invalidate their token.
    pub async fn unsubscribe(pool: &PgPool, id: &str) -> Result<Option<Subscriber>, sqlx::Error> {
        let query = format!(
            "UPDATE subscribers SET
                subscribed = FALSE,
                unsubscribed_at = NOW(),
                unsubscribe_token_hash = NULL,
                unsubscribe_token_expires_at = NULL,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscriber>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Store a fresh unsubscribe token hash with its expiry, replacing any
    /// previous one.
    pub async fn rotate_token(
        pool: &PgPool,
        id: &str,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE subscribers SET
                unsubscribe_token_hash = $2,
                unsubscribe_token_expires_at = $3,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Look up a subscriber by unsubscribe token hash, regardless of expiry.
    /// The caller distinguishes expired (410) from unknown (404).
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Subscriber>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscribers WHERE unsubscribe_token_hash = $1");
        sqlx::query_as::<_, Subscriber>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// List subscribers matching the AND-combined filter, newest signup first.
    pub async fn list(
        pool: &PgPool,
        filter: &SubscriberFilter,
    ) -> Result<Vec<Subscriber>, sqlx::Error> {
        let mut clauses: Vec<String> = Vec::new();
        let mut text_binds: Vec<&str> = Vec::new();
        let mut idx = 1u32;

        if let Some(source) = &filter.source {
            clauses.push(format!("source = ${idx}"));
            text_binds.push(source);
            idx += 1;
        }
        if let Some(interest) = &filter.interest {
            clauses.push(format!("${idx} = ANY(interests)"));
            text_binds.push(interest);
            idx += 1;
        }
        if filter.subscribed.is_some() {
            clauses.push(format!("subscribed = ${idx}"));
            idx += 1;
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let query = format!(
            "SELECT {COLUMNS} FROM subscribers {where_clause} \
             ORDER BY subscribed_at DESC LIMIT ${idx}"
        );

        let mut q = sqlx::query_as::<_, Subscriber>(&query);
        for bind in text_binds {
            q = q.bind(bind);
        }
        if let Some(subscribed) = filter.subscribed {
            q = q.bind(subscribed);
        }
        q.bind(filter.limit).fetch_all(pool).await
    }

    /// Resolve a campaign audience selector to its recipient rows.
    pub async fn recipients(
        pool: &PgPool,
        audience: &AudienceFilter,
    ) -> Result<Vec<Subscriber>, sqlx::Error> {
        let (where_clause, value) = match audience {
            AudienceFilter::All => ("", None),
            AudienceFilter::Subscribed => ("WHERE subscribed = TRUE", None),
            AudienceFilter::Interest { value } => {
                ("WHERE subscribed = TRUE AND $1 = ANY(interests)", Some(value))
            }
            AudienceFilter::Source { value } => {
                ("WHERE subscribed = TRUE AND source = $1", Some(value))
            }
        };
        let query = format!("SELECT {COLUMNS} FROM subscribers {where_clause} ORDER BY subscribed_at DESC");
        let mut q = sqlx::query_as::<_, Subscriber>(&query);
        if let Some(value) = value {
            q = q.bind(value);
        }
        q.fetch_all(pool).await
    }

    /// Update a subscriber. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateSubscriber,
    ) -> Result<Option<Subscriber>, sqlx::Error> {
        let query = format!(
            "UPDATE subscribers SET
                name = COALESCE($2, name),
                subscribed = COALESCE($3, subscribed),
                interests = COALESCE($4, interests),
                unsubscribed_at = CASE
                    WHEN $3 = FALSE THEN NOW()
                    WHEN $3 = TRUE THEN NULL
                    ELSE unsubscribed_at
                END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscriber>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.subscribed)
            .bind(&input.interests)
            .fetch_optional(pool)
            .await
    }

    /// Delete a subscriber. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscribers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stamp `last_email_sent` after a campaign delivery.
    pub async fn stamp_email_sent(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE subscribers SET last_email_sent = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// `(total, currently_subscribed)` counts for the stats read-side.
    pub async fn counts(pool: &PgPool) -> Result<(i64, i64), sqlx::Error> {
        let row: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE subscribed) FROM subscribers",
        )
        .fetch_one(pool)
        .await?;
        Ok(row)
    }
}
