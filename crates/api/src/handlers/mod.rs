//! HTTP handlers, one module per resource.

pub mod activity;
pub mod auth;
pub mod films;
pub mod health;
pub mod notifications;
pub mod productions;
pub mod settings;
pub mod stories;
pub mod subscribers;
pub mod upload;
pub mod users;
pub mod webhooks;

use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::json;

use backlot_core::error::CoreError;
use backlot_core::id::is_valid_entity_id;

use crate::error::AppError;

/// Reject malformed entity ids with 400 before any store access.
pub(crate) fn check_entity_id(id: &str) -> Result<(), AppError> {
    if !is_valid_entity_id(id) {
        return Err(AppError::Core(CoreError::invalid_field(
            "id",
            "must be a 24-character hex id",
        )));
    }
    Ok(())
}

/// Deserialize a buffered JSON body into a DTO.
///
/// Handlers take `Json<serde_json::Value>` and parse through this so serde
/// failures (wrong types, unknown fields on strict DTOs) come back in the
/// standard `{error}` shape instead of axum's plain-text rejection.
pub(crate) fn parse_body<T: DeserializeOwned>(raw: serde_json::Value) -> Result<T, AppError> {
    serde_json::from_value(raw).map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}

/// 405 for the deprecated slug-based mutation routes.
///
/// The slug routes stay registered so existing clients get guidance instead
/// of a confusing 404; GET by slug remains live for public pages.
pub(crate) async fn deprecated_slug_mutation() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": "Mutations by slug are no longer supported. Use the /id/{id} route instead."
        })),
    )
}
