//! Handlers for the per-user notification inbox.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use backlot_core::error::CoreError;
use backlot_core::id::is_valid_entity_id;
use backlot_core::pagination::{clamp_limit, clamp_page, offset, total_pages};
use backlot_db::models::notification::{MarkReadRequest, MarkReadTarget, Notification};
use backlot_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::parse_body;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Query parameters accepted by `GET /notifications`.
#[derive(Debug, Default, Deserialize)]
pub struct InboxQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Only the literal `"true"` restricts the page to unread rows.
    pub unread: Option<String>,
}

/// Response body for `GET /notifications`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxResponse {
    pub notifications: Vec<Notification>,
    pub total: i64,
    pub unread_count: i64,
    pub page: i64,
    pub total_pages: i64,
}

/// GET /api/notifications
///
/// One page of the caller's inbox, newest first. `unreadCount` is computed
/// independently of the requested page; when the page itself is filtered to
/// unread rows the filtered total doubles as the unread count.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<InboxQuery>,
) -> AppResult<Json<InboxResponse>> {
    let unread_only = query.unread.as_deref() == Some("true");
    let limit = clamp_limit(query.limit);
    let page = clamp_page(query.page);

    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        &user.user_id,
        unread_only,
        limit,
        offset(page, limit),
    )
    .await?;
    let total = NotificationRepo::count_for_user(&state.pool, &user.user_id, unread_only).await?;
    let unread_count = if unread_only {
        total
    } else {
        NotificationRepo::unread_count(&state.pool, &user.user_id).await?
    };

    Ok(Json(InboxResponse {
        notifications,
        total,
        unread_count,
        page,
        total_pages: total_pages(total, limit),
    }))
}

/// PATCH /api/notifications
///
/// Body `{ids: "all"}` marks the whole inbox read; `{ids: [id…]}` marks an
/// explicit set. Rows owned by other users are never touched.
pub async fn mark_read(
    user: AuthUser,
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<serde_json::Value>> {
    let input: MarkReadRequest = parse_body(raw)?;

    let modified = match input.ids {
        MarkReadTarget::Keyword(ref keyword) if keyword == "all" => {
            NotificationRepo::mark_all_read(&state.pool, &user.user_id).await?
        }
        MarkReadTarget::Keyword(_) => {
            return Err(AppError::Core(CoreError::invalid_field(
                "ids",
                "must be the string \"all\" or an array of notification ids",
            )));
        }
        MarkReadTarget::Ids(ids) => {
            if let Some(bad) = ids.iter().find(|id| !is_valid_entity_id(id)) {
                return Err(AppError::Core(CoreError::invalid_field(
                    "ids",
                    &format!("contains a malformed id: {bad}"),
                )));
            }
            NotificationRepo::mark_read(&state.pool, &user.user_id, &ids).await?
        }
    };

    Ok(Json(json!({"message": "Notifications updated", "modified": modified})))
}
