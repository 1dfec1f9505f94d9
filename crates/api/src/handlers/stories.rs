//! Handlers for the `/stories` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use backlot_core::error::CoreError;
use backlot_core::pagination::clamp_limit;
use backlot_core::validate::literal_bool;
use backlot_db::models::story::{CreateStory, Story, StoryFilter, UpdateStory};
use backlot_db::repositories::StoryRepo;

use crate::activity::{record_mutation, MutationRecord};
use crate::error::{AppError, AppResult};
use crate::handlers::{check_entity_id, parse_body};
use crate::middleware::{RequireContent, RequireContentDelete};
use crate::state::AppState;

/// Query parameters accepted by `GET /stories`.
#[derive(Debug, Default, Deserialize)]
pub struct StoryListQuery {
    pub category: Option<String>,
    pub featured: Option<String>,
    pub limit: Option<i64>,
}

impl StoryListQuery {
    fn into_filter(self) -> StoryFilter {
        StoryFilter {
            category: self.category,
            featured: self.featured.as_deref().and_then(literal_bool),
            limit: clamp_limit(self.limit),
        }
    }
}

/// GET /api/stories
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<StoryListQuery>,
) -> AppResult<Json<Vec<Story>>> {
    let stories = StoryRepo::list(&state.pool, &query.into_filter()).await?;
    Ok(Json(stories))
}

/// GET /api/stories/id/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Story>> {
    check_entity_id(&id)?;
    let story = StoryRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("Story", &id))?;
    Ok(Json(story))
}

/// GET /api/stories/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Story>> {
    let story = StoryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Story", &slug))?;
    Ok(Json(story))
}

/// POST /api/stories
pub async fn create(
    RequireContent(user): RequireContent,
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<Story>)> {
    let input: CreateStory = parse_body(raw)?;
    input.validate().map_err(CoreError::invalid)?;

    if StoryRepo::slug_in_use(&state.pool, &input.slug, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A story with this slug already exists".into(),
        )));
    }

    let story = StoryRepo::create(&state.pool, &input).await?;
    tracing::info!(story_id = %story.id, actor = %user.user_id, "story created");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "story",
            event: "created",
            item_id: story.id.clone(),
            label: story.title.clone(),
            actor_id: user.user_id,
            link: Some(format!("/admin/stories/{}", story.id)),
        },
    );
    Ok((StatusCode::CREATED, Json(story)))
}

/// PATCH /api/stories/id/{id}
pub async fn update(
    RequireContent(user): RequireContent,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<Story>> {
    check_entity_id(&id)?;
    let input: UpdateStory = parse_body(raw)?;
    input.validate().map_err(CoreError::invalid)?;

    if let Some(slug) = &input.slug {
        if StoryRepo::slug_in_use(&state.pool, slug, Some(&id)).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "A story with this slug already exists".into(),
            )));
        }
    }

    let story = StoryRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Story", &id))?;
    tracing::info!(story_id = %story.id, actor = %user.user_id, "story updated");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "story",
            event: "updated",
            item_id: story.id.clone(),
            label: story.title.clone(),
            actor_id: user.user_id,
            link: Some(format!("/admin/stories/{}", story.id)),
        },
    );
    Ok(Json(story))
}

/// DELETE /api/stories/id/{id}
pub async fn delete(
    RequireContentDelete(user): RequireContentDelete,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    check_entity_id(&id)?;
    let story = StoryRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("Story", &id))?;

    StoryRepo::delete(&state.pool, &id).await?;
    tracing::info!(story_id = %id, actor = %user.user_id, "story deleted");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "story",
            event: "deleted",
            item_id: id,
            label: story.title,
            actor_id: user.user_id,
            link: None,
        },
    );
    Ok(Json(json!({"message": "Story deleted"})))
}
