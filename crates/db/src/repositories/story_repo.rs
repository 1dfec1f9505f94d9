//! Repository for the `stories` table.

use sqlx::types::Json;
use sqlx::PgPool;

use backlot_core::id::new_entity_id;

use crate::models::story::{CreateStory, Story, StoryFilter, UpdateStory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, slug, excerpt, content, author, date, image, category, \
                       read_time, featured, created_at, updated_at";

/// Provides CRUD operations for stories.
pub struct StoryRepo;

impl StoryRepo {
    /// Insert a new story, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStory) -> Result<Story, sqlx::Error> {
        let query = format!(
            "INSERT INTO stories (id, title, slug, excerpt, content, author, date, image, \
             category, read_time, featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(new_entity_id())
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(Json(&input.content))
            .bind(&input.author)
            .bind(&input.date)
            .bind(&input.image)
            .bind(&input.category)
            .bind(&input.read_time)
            .bind(input.featured)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Story>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stories WHERE id = $1");
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Story>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stories WHERE slug = $1");
        sqlx::query_as::<_, Story>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether `slug` is already taken by a story other than `exclude_id`.
    pub async fn slug_in_use(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM stories WHERE slug = $1 AND ($2::TEXT IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// List stories matching the AND-combined filter.
    ///
    /// Ordered by publish date, not insertion order; `created_at` breaks
    /// ties between stories published the same day.
    pub async fn list(pool: &PgPool, filter: &StoryFilter) -> Result<Vec<Story>, sqlx::Error> {
        let mut clauses: Vec<String> = Vec::new();
        let mut text_binds: Vec<&str> = Vec::new();
        let mut idx = 1u32;

        if let Some(category) = &filter.category {
            clauses.push(format!("category = ${idx}"));
            text_binds.push(category);
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
            "SELECT {COLUMNS} FROM stories {where_clause} \
             ORDER BY date DESC, created_at DESC LIMIT ${idx}"
        );

        let mut q = sqlx::query_as::<_, Story>(&query);
        for bind in text_binds {
            q = q.bind(bind);
        }
        if let Some(featured) = filter.featured {
            q = q.bind(featured);
        }
        q.bind(filter.limit).fetch_all(pool).await
    }

    /// Update a story. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateStory,
    ) -> Result<Option<Story>, sqlx::Error> {
        let query = format!(
            "UPDATE stories SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                excerpt = COALESCE($4, excerpt),
                content = COALESCE($5, content),
                author = COALESCE($6, author),
                date = COALESCE($7, date),
                image = COALESCE($8, image),
                category = COALESCE($9, category),
                read_time = COALESCE($10, read_time),
                featured = COALESCE($11, featured),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(input.content.as_ref().map(Json))
            .bind(&input.author)
            .bind(&input.date)
            .bind(&input.image)
            .bind(&input.category)
            .bind(&input.read_time)
            .bind(input.featured)
            .fetch_optional(pool)
            .await
    }

    /// Delete a story. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM stories")
            .fetch_one(pool)
            .await
    }
}
