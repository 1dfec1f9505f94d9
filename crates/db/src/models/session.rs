//! Refresh-token session model.

use sqlx::FromRow;

use backlot_core::types::{EntityId, Timestamp};

/// One refresh-token session. Only the SHA-256 hash of the token is stored,
/// so a database leak does not compromise active sessions.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: EntityId,
    pub user_id: EntityId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked: bool,
    pub created_at: Timestamp,
}
