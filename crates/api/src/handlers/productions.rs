//! Handlers for the `/productions` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use backlot_core::error::CoreError;
use backlot_core::pagination::clamp_limit;
use backlot_core::validate::literal_bool;
use backlot_db::models::production::{
    CreateProduction, Production, ProductionFilter, UpdateProduction,
};
use backlot_db::repositories::ProductionRepo;

use crate::activity::{record_mutation, MutationRecord};
use crate::error::{AppError, AppResult};
use crate::handlers::{check_entity_id, parse_body};
use crate::middleware::{RequireContent, RequireContentDelete};
use crate::state::AppState;

/// Query parameters accepted by `GET /productions`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductionListQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub featured: Option<String>,
    pub limit: Option<i64>,
}

impl ProductionListQuery {
    fn into_filter(self) -> ProductionFilter {
        ProductionFilter {
            category: self.category,
            status: self.status,
            featured: self.featured.as_deref().and_then(literal_bool),
            limit: clamp_limit(self.limit),
        }
    }
}

/// GET /api/productions
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductionListQuery>,
) -> AppResult<Json<Vec<Production>>> {
    let productions = ProductionRepo::list(&state.pool, &query.into_filter()).await?;
    Ok(Json(productions))
}

/// GET /api/productions/id/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Production>> {
    check_entity_id(&id)?;
    let production = ProductionRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("Production", &id))?;
    Ok(Json(production))
}

/// GET /api/productions/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Production>> {
    let production = ProductionRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Production", &slug))?;
    Ok(Json(production))
}

/// POST /api/productions
pub async fn create(
    RequireContent(user): RequireContent,
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<Production>)> {
    let input: CreateProduction = parse_body(raw)?;
    input.validate().map_err(CoreError::invalid)?;

    if ProductionRepo::slug_in_use(&state.pool, &input.slug, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A production with this slug already exists".into(),
        )));
    }

    let production = ProductionRepo::create(&state.pool, &input).await?;
    tracing::info!(production_id = %production.id, actor = %user.user_id, "production created");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "production",
            event: "created",
            item_id: production.id.clone(),
            label: production.title.clone(),
            actor_id: user.user_id,
            link: Some(format!("/admin/productions/{}", production.id)),
        },
    );
    Ok((StatusCode::CREATED, Json(production)))
}

/// PATCH /api/productions/id/{id}
pub async fn update(
    RequireContent(user): RequireContent,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<Production>> {
    check_entity_id(&id)?;
    let input: UpdateProduction = parse_body(raw)?;
    input.validate().map_err(CoreError::invalid)?;

    if let Some(slug) = &input.slug {
        if ProductionRepo::slug_in_use(&state.pool, slug, Some(&id)).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "A production with this slug already exists".into(),
            )));
        }
    }

    let production = ProductionRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Production", &id))?;
    tracing::info!(production_id = %production.id, actor = %user.user_id, "production updated");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "production",
            event: "updated",
            item_id: production.id.clone(),
            label: production.title.clone(),
            actor_id: user.user_id,
            link: Some(format!("/admin/productions/{}", production.id)),
        },
    );
    Ok(Json(production))
}

/// DELETE /api/productions/id/{id}
pub async fn delete(
    RequireContentDelete(user): RequireContentDelete,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    check_entity_id(&id)?;
    let production = ProductionRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("Production", &id))?;

    ProductionRepo::delete(&state.pool, &id).await?;
    tracing::info!(production_id = %id, actor = %user.user_id, "production deleted");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "production",
            event: "deleted",
            item_id: id,
            label: production.title,
            actor_id: user.user_id,
            link: None,
        },
    );
    Ok(Json(json!({"message": "Production deleted"})))
}
