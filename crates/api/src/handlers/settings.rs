//! Handlers for the site settings singleton.

use axum::extract::State;
use axum::Json;

use backlot_core::error::CoreError;
use backlot_db::models::settings::{SiteSettings, UpdateSettings, SINGLETON_KEY};
use backlot_db::repositories::SettingsRepo;

use crate::activity::{record_mutation, MutationRecord};
use crate::error::AppResult;
use crate::handlers::parse_body;
use crate::middleware::RequireContent;
use crate::state::AppState;

/// GET /api/settings (public)
///
/// First read creates the row with defaults; concurrent first reads converge
/// on the same row via the upsert in the repository.
pub async fn get(State(state): State<AppState>) -> AppResult<Json<SiteSettings>> {
    let settings = SettingsRepo::get_or_create(&state.pool).await?;
    Ok(Json(settings))
}

/// PUT /api/settings
///
/// Full replace of the editable fields; omitted optional fields reset to
/// empty rather than being preserved.
pub async fn update(
    RequireContent(user): RequireContent,
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<SiteSettings>> {
    let input: UpdateSettings = parse_body(raw)?;
    input.validate().map_err(CoreError::invalid)?;

    let settings = SettingsRepo::replace(&state.pool, &input).await?;
    tracing::info!(actor = %user.user_id, "site settings replaced");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "settings",
            event: "updated",
            item_id: SINGLETON_KEY.to_string(),
            label: settings.site_name.clone(),
            actor_id: user.user_id,
            link: Some("/admin/settings".to_string()),
        },
    );
    Ok(Json(settings))
}
