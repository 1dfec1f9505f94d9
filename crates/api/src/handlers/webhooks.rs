//! Inbound webhook from the email delivery provider.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use backlot_core::error::CoreError;
use backlot_db::models::campaign::CAMPAIGN_EVENTS;
use backlot_db::repositories::CampaignRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::{check_entity_id, parse_body};
use crate::state::AppState;

/// Header carrying the shared webhook secret.
const SECRET_HEADER: &str = "x-webhook-secret";

/// Request body for `POST /webhooks/email`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailEventRequest {
    pub campaign_id: String,
    pub event: String,
    /// Number of occurrences being reported; defaults to 1.
    pub count: Option<i32>,
}

/// POST /api/webhooks/email
///
/// Increments one of a campaign's engagement counters. Authenticated by a
/// shared secret header; the route rejects everything when `WEBHOOK_SECRET`
/// is unset.
pub async fn email_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<serde_json::Value>> {
    let expected = state.config.webhook_secret.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Webhook not configured".into()))
    })?;
    let provided = headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if provided != expected {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid webhook secret".into(),
        )));
    }

    let input: EmailEventRequest = parse_body(raw)?;
    check_entity_id(&input.campaign_id)?;
    if !CAMPAIGN_EVENTS.contains(&input.event.as_str()) {
        return Err(AppError::Core(CoreError::invalid_field(
            "event",
            "must be one of: delivered, opened, clicked, bounced",
        )));
    }
    let count = input.count.unwrap_or(1);
    if count <= 0 {
        return Err(AppError::Core(CoreError::invalid_field(
            "count",
            "must be a positive integer",
        )));
    }

    let updated =
        CampaignRepo::increment_event(&state.pool, &input.campaign_id, &input.event, count).await?;
    if !updated {
        return Err(AppError::Core(CoreError::not_found(
            "Campaign",
            &input.campaign_id,
        )));
    }

    tracing::info!(campaign_id = %input.campaign_id, event = %input.event, count,
        "campaign engagement recorded");
    Ok(Json(json!({"message": "Event recorded"})))
}
