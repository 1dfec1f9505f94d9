//! Repository for the `films` table.

use sqlx::types::Json;
use sqlx::PgPool;

use backlot_core::id::new_entity_id;

use crate::models::film::{CreateFilm, Film, FilmFilter, UpdateFilm};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, slug, category, year, description, long_description, image, \
                       director, producer, duration, languages, subtitles, release_date, awards, \
                       cast_crew, gallery, trailer, synopsis, quotes, rating, featured, \
                       created_at, updated_at";

/// Provides CRUD operations for films.
pub struct FilmRepo;

impl FilmRepo {
    /// Insert a new film, returning the created row.
    ///
    /// Violating `uq_films_slug` surfaces as a database error the caller
    /// maps to 409; the handler's proactive pre-check only narrows the race.
    pub async fn create(pool: &PgPool, input: &CreateFilm) -> Result<Film, sqlx::Error> {
        let query = format!(
            "INSERT INTO films (id, title, slug, category, year, description, long_description, \
             image, director, producer, duration, languages, subtitles, release_date, awards, \
             cast_crew, gallery, trailer, synopsis, quotes, rating, featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
             $18, $19, $20, $21, $22)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Film>(&query)
            .bind(new_entity_id())
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.category)
            .bind(&input.year)
            .bind(&input.description)
            .bind(&input.long_description)
            .bind(&input.image)
            .bind(&input.director)
            .bind(&input.producer)
            .bind(&input.duration)
            .bind(&input.languages)
            .bind(&input.subtitles)
            .bind(&input.release_date)
            .bind(&input.awards)
            .bind(Json(&input.cast_crew))
            .bind(&input.gallery)
            .bind(&input.trailer)
            .bind(&input.synopsis)
            .bind(Json(&input.quotes))
            .bind(input.rating)
            .bind(input.featured)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Film>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM films WHERE id = $1");
        sqlx::query_as::<_, Film>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Film>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM films WHERE slug = $1");
        sqlx::query_as::<_, Film>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether `slug` is already taken by a film other than `exclude_id`.
    ///
    /// Pass `None` on create; pass the record's own id on update so renaming
    /// a film to its current slug is not a collision.
    pub async fn slug_in_use(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM films WHERE slug = $1 AND ($2::TEXT IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// List films matching the AND-combined filter, newest first.
    pub async fn list(pool: &PgPool, filter: &FilmFilter) -> Result<Vec<Film>, sqlx::Error> {
        let mut clauses: Vec<String> = Vec::new();
        let mut text_binds: Vec<&str> = Vec::new();
        let mut idx = 1u32;

        if let Some(category) = &filter.category {
            clauses.push(format!("category = ${idx}"));
            text_binds.push(category);
            idx += 1;
        }
        if let Some(year) = &filter.year {
            clauses.push(format!("year = ${idx}"));
            text_binds.push(year);
            idx += 1;
        }
        if let Some(director) = &filter.director {
            clauses.push(format!("director = ${idx}"));
            text_binds.push(director);
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
            "SELECT {COLUMNS} FROM films {where_clause} ORDER BY created_at DESC LIMIT ${idx}"
        );

        let mut q = sqlx::query_as::<_, Film>(&query);
        for bind in text_binds {
            q = q.bind(bind);
        }
        if let Some(featured) = filter.featured {
            q = q.bind(featured);
        }
        q.bind(filter.limit).fetch_all(pool).await
    }

    /// Update a film. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateFilm,
    ) -> Result<Option<Film>, sqlx::Error> {
        let query = format!(
            "UPDATE films SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                category = COALESCE($4, category),
                year = COALESCE($5, year),
                description = COALESCE($6, description),
                long_description = COALESCE($7, long_description),
                image = COALESCE($8, image),
                director = COALESCE($9, director),
                producer = COALESCE($10, producer),
                duration = COALESCE($11, duration),
                languages = COALESCE($12, languages),
                subtitles = COALESCE($13, subtitles),
                release_date = COALESCE($14, release_date),
                awards = COALESCE($15, awards),
                cast_crew = COALESCE($16, cast_crew),
                gallery = COALESCE($17, gallery),
                trailer = COALESCE($18, trailer),
                synopsis = COALESCE($19, synopsis),
                quotes = COALESCE($20, quotes),
                rating = COALESCE($21, rating),
                featured = COALESCE($22, featured),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Film>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.category)
            .bind(&input.year)
            .bind(&input.description)
            .bind(&input.long_description)
            .bind(&input.image)
            .bind(&input.director)
            .bind(&input.producer)
            .bind(&input.duration)
            .bind(&input.languages)
            .bind(&input.subtitles)
            .bind(&input.release_date)
            .bind(&input.awards)
            .bind(input.cast_crew.as_ref().map(Json))
            .bind(&input.gallery)
            .bind(&input.trailer)
            .bind(&input.synopsis)
            .bind(input.quotes.as_ref().map(Json))
            .bind(input.rating)
            .bind(input.featured)
            .fetch_optional(pool)
            .await
    }

    /// Delete a film. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM films WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM films")
            .fetch_one(pool)
            .await
    }
}
