//! Fire-and-forget audit recording and staff notification fan-out.
//!
//! Every successful content mutation calls [`record_mutation`] after the
//! response payload is already decided. The write happens on a spawned task:
//! audit and inbox rows are advisory, and a failure there must never turn a
//! committed mutation into an error response.

use backlot_core::types::EntityId;
use backlot_db::models::activity::NewActivityEntry;
use backlot_db::models::notification::NewNotification;
use backlot_db::repositories::{ActivityRepo, NotificationRepo, UserRepo};
use backlot_db::DbPool;

/// What a completed mutation looks like to the audit trail.
#[derive(Debug, Clone)]
pub struct MutationRecord {
    /// Entity kind, e.g. `"film"`, `"story"`, `"user"`.
    pub entity: &'static str,
    /// Mutation verb: `"created"`, `"updated"`, or `"deleted"`.
    pub event: &'static str,
    /// The affected row's id.
    pub item_id: EntityId,
    /// Human-readable label for the notification message (title, name, ...).
    pub label: String,
    /// The authenticated actor.
    pub actor_id: EntityId,
    /// Dashboard path to the affected item, if one exists after the mutation.
    pub link: Option<String>,
}

/// Record a mutation in the activity log and notify the rest of the staff.
///
/// Spawns a background task and returns immediately. Failures are logged at
/// `warn` and otherwise swallowed.
pub fn record_mutation(pool: &DbPool, record: MutationRecord) {
    let pool = pool.clone();
    tokio::spawn(async move {
        let entry = NewActivityEntry {
            page_url: record
                .link
                .clone()
                .unwrap_or_else(|| format!("/admin/{}s", record.entity)),
            page_type: record.entity.to_string(),
            event: record.event.to_string(),
            item_id: Some(record.item_id.clone()),
            actor_id: Some(record.actor_id.clone()),
            extra: Some(serde_json::json!({ "label": record.label })),
        };
        if let Err(err) = ActivityRepo::create(&pool, &entry).await {
            tracing::warn!(error = %err, entity = record.entity, event = record.event,
                "failed to append activity entry");
        }

        notify_staff(&pool, &record).await;
    });
}

/// Fan a notification out to every staff account except the actor.
async fn notify_staff(pool: &DbPool, record: &MutationRecord) {
    let recipients = match UserRepo::list_ids_except(pool, &record.actor_id).await {
        Ok(ids) => ids,
        Err(err) => {
            tracing::warn!(error = %err, "failed to resolve notification recipients");
            return;
        }
    };

    let actor_name = match UserRepo::find_by_id(pool, &record.actor_id).await {
        Ok(Some(actor)) => actor.name,
        _ => "Someone".to_string(),
    };

    let notification = NewNotification {
        message: format!(
            "{actor_name} {} {} \"{}\"",
            record.event, record.entity, record.label
        ),
        kind: record.event.to_string(),
        related_kind: Some(record.entity.to_string()),
        related_id: Some(record.item_id.clone()),
        link: record.link.clone(),
    };

    for user_id in recipients {
        if let Err(err) = NotificationRepo::create(pool, &user_id, &notification).await {
            tracing::warn!(error = %err, recipient = %user_id, "failed to insert notification");
        }
    }
}
