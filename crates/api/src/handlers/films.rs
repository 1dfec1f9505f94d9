//! Handlers for the `/films` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use backlot_core::error::CoreError;
use backlot_core::pagination::clamp_limit;
use backlot_core::validate::literal_bool;
use backlot_db::models::film::{CreateFilm, Film, FilmFilter, UpdateFilm};
use backlot_db::repositories::FilmRepo;

use crate::activity::{record_mutation, MutationRecord};
use crate::error::{AppError, AppResult};
use crate::handlers::{check_entity_id, parse_body};
use crate::middleware::{RequireContent, RequireContentDelete};
use crate::state::AppState;

/// Query parameters accepted by `GET /films`.
///
/// `featured` arrives as a raw string: only the literals `"true"`/`"false"`
/// activate the filter, anything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct FilmListQuery {
    pub category: Option<String>,
    pub year: Option<String>,
    pub director: Option<String>,
    pub featured: Option<String>,
    pub limit: Option<i64>,
}

impl FilmListQuery {
    fn into_filter(self) -> FilmFilter {
        FilmFilter {
            category: self.category,
            year: self.year,
            director: self.director,
            featured: self.featured.as_deref().and_then(literal_bool),
            limit: clamp_limit(self.limit),
        }
    }
}

/// GET /api/films
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<FilmListQuery>,
) -> AppResult<Json<Vec<Film>>> {
    let films = FilmRepo::list(&state.pool, &query.into_filter()).await?;
    Ok(Json(films))
}

/// GET /api/films/id/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Film>> {
    check_entity_id(&id)?;
    let film = FilmRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("Film", &id))?;
    Ok(Json(film))
}

/// GET /api/films/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Film>> {
    let film = FilmRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Film", &slug))?;
    Ok(Json(film))
}

/// POST /api/films
pub async fn create(
    RequireContent(user): RequireContent,
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<Film>)> {
    let input: CreateFilm = parse_body(raw)?;
    input.validate().map_err(CoreError::invalid)?;

    if FilmRepo::slug_in_use(&state.pool, &input.slug, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A film with this slug already exists".into(),
        )));
    }

    let film = FilmRepo::create(&state.pool, &input).await?;
    tracing::info!(film_id = %film.id, actor = %user.user_id, "film created");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "film",
            event: "created",
            item_id: film.id.clone(),
            label: film.title.clone(),
            actor_id: user.user_id,
            link: Some(format!("/admin/films/{}", film.id)),
        },
    );
    Ok((StatusCode::CREATED, Json(film)))
}

/// PATCH /api/films/id/{id}
pub async fn update(
    RequireContent(user): RequireContent,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<Film>> {
    check_entity_id(&id)?;
    let input: UpdateFilm = parse_body(raw)?;
    input.validate().map_err(CoreError::invalid)?;

    if let Some(slug) = &input.slug {
        if FilmRepo::slug_in_use(&state.pool, slug, Some(&id)).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "A film with this slug already exists".into(),
            )));
        }
    }

    let film = FilmRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Film", &id))?;
    tracing::info!(film_id = %film.id, actor = %user.user_id, "film updated");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "film",
            event: "updated",
            item_id: film.id.clone(),
            label: film.title.clone(),
            actor_id: user.user_id,
            link: Some(format!("/admin/films/{}", film.id)),
        },
    );
    Ok(Json(film))
}

/// DELETE /api/films/id/{id}
pub async fn delete(
    RequireContentDelete(user): RequireContentDelete,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    check_entity_id(&id)?;
    let film = FilmRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("Film", &id))?;

    FilmRepo::delete(&state.pool, &id).await?;
    tracing::info!(film_id = %id, actor = %user.user_id, "film deleted");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "film",
            event: "deleted",
            item_id: id,
            label: film.title,
            actor_id: user.user_id,
            link: None,
        },
    );
    Ok(Json(json!({"message": "Film deleted"})))
}
