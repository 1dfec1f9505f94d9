//! Activity (audit) trail models. Append-only, advisory.

use serde::Serialize;
use sqlx::FromRow;

use backlot_core::types::{EntityId, Timestamp};

/// One recorded mutation. Immutable once written (no `updated_at`).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: EntityId,
    pub page_url: String,
    pub page_type: String,
    pub event: String,
    pub item_id: Option<EntityId>,
    pub actor_id: Option<EntityId>,
    pub extra: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// Insert payload for the best-effort activity writer.
#[derive(Debug, Clone)]
pub struct NewActivityEntry {
    pub page_url: String,
    pub page_type: String,
    pub event: String,
    pub item_id: Option<EntityId>,
    pub actor_id: Option<EntityId>,
    pub extra: Option<serde_json::Value>,
}

/// Typed filters for the admin activity read-side.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub page_type: Option<String>,
    pub event: Option<String>,
    pub limit: i64,
}
