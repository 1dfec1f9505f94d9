//! Subscriber entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use backlot_core::types::{EntityId, Timestamp};
use backlot_core::validate::{self, Issues};

/// Full subscriber row from the `subscribers` table.
///
/// Token fields are never serialized; they exist only for the unsubscribe
/// flow.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: EntityId,
    pub email: String,
    pub name: String,
    pub subscribed: bool,
    pub subscribed_at: Timestamp,
    pub unsubscribed_at: Option<Timestamp>,
    pub interests: Vec<String>,
    pub source: String,
    pub last_email_sent: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub unsubscribe_token_hash: Option<String>,
    #[serde(skip_serializing)]
    pub unsubscribe_token_expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Wire DTO for the public `POST /subscribers` opt-in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl SubscribeRequest {
    pub fn validate(&self) -> Result<(), Issues> {
        let mut issues = Issues::new();
        issues.check("email", validate::email(&self.email));
        issues.into_result()
    }
}

/// Wire DTO for the admin `PATCH /subscribers/id/{id}`. Strict: `email` is
/// not editable (it is the identity of the row).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSubscriber {
    pub name: Option<String>,
    pub subscribed: Option<bool>,
    pub interests: Option<Vec<String>>,
}

/// Typed equality filters for subscriber listings.
#[derive(Debug, Clone, Default)]
pub struct SubscriberFilter {
    pub subscribed: Option<bool>,
    pub source: Option<String>,
    /// Matches rows whose `interests` array contains this value.
    pub interest: Option<String>,
    pub limit: i64,
}
