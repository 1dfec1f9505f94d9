//! Campaign entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use backlot_core::audience::AudienceFilter;
use backlot_core::types::{EntityId, Timestamp};
use backlot_core::validate::{self, Issues};

/// Full campaign row from the `campaigns` table.
///
/// Engagement counters stay `NULL` until the delivery provider's webhook
/// populates them.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: EntityId,
    pub subject: String,
    pub content: String,
    pub filter: Json<AudienceFilter>,
    pub status: String,
    pub recipient_count: i32,
    pub delivered: Option<i32>,
    pub opened: Option<i32>,
    pub clicked: Option<i32>,
    pub bounced: Option<i32>,
    pub created_by: EntityId,
    pub created_at: Timestamp,
}

/// Wire DTO for `POST /subscribers/send-email`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCampaign {
    pub subject: String,
    pub content: String,
    /// Defaults to currently subscribed recipients.
    #[serde(default)]
    pub filter: AudienceFilter,
}

impl SendCampaign {
    pub fn validate(&self) -> Result<(), Issues> {
        let mut issues = Issues::new();
        issues.check("subject", validate::required(&self.subject));
        issues.check("content", validate::required(&self.content));
        self.filter.validate_into(&mut issues);
        issues.into_result()
    }
}

/// Engagement events a delivery webhook may report.
pub const CAMPAIGN_EVENTS: [&str; 4] = ["delivered", "opened", "clicked", "bounced"];
