//! Notification entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use backlot_core::types::{EntityId, Timestamp};

/// One inbox item. `user_id` is always server-derived, never client-supplied.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: EntityId,
    pub user_id: EntityId,
    pub message: String,
    pub kind: String,
    pub read: bool,
    pub related_kind: Option<String>,
    pub related_id: Option<EntityId>,
    pub link: Option<String>,
    pub created_at: Timestamp,
}

/// Insert payload for the fan-out writer.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub message: String,
    pub kind: String,
    pub related_kind: Option<String>,
    pub related_id: Option<EntityId>,
    pub link: Option<String>,
}

/// Body of `PATCH /notifications`: either the literal string `"all"` or an
/// explicit id set.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MarkReadTarget {
    Keyword(String),
    Ids(Vec<EntityId>),
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub ids: MarkReadTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_read_accepts_both_shapes() {
        let all: MarkReadRequest =
            serde_json::from_value(serde_json::json!({"ids": "all"})).expect("keyword parses");
        assert!(matches!(all.ids, MarkReadTarget::Keyword(ref s) if s == "all"));

        let ids: MarkReadRequest = serde_json::from_value(
            serde_json::json!({"ids": ["5f2b8c9d1e3a4f5b6c7d8e9f"]}),
        )
        .expect("id list parses");
        assert!(matches!(ids.ids, MarkReadTarget::Ids(ref v) if v.len() == 1));
    }

    #[test]
    fn mark_read_rejects_other_shapes() {
        let result: Result<MarkReadRequest, _> =
            serde_json::from_value(serde_json::json!({"ids": 42}));
        assert!(result.is_err());
    }
}
