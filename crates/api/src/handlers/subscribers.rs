//! Handlers for the `/subscribers` resource: the public opt-in/opt-out flow,
//! the admin management surface, and campaign sends.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use backlot_core::error::CoreError;
use backlot_core::pagination::clamp_limit;
use backlot_core::validate::{literal_bool, normalize_email};
use backlot_db::models::campaign::{Campaign, SendCampaign};
use backlot_db::models::subscriber::{
    SubscribeRequest, Subscriber, SubscriberFilter, UpdateSubscriber,
};
use backlot_db::repositories::{CampaignRepo, SubscriberRepo};

use crate::activity::{record_mutation, MutationRecord};
use crate::auth::jwt::{generate_opaque_token, hash_opaque_token};
use crate::error::{AppError, AppResult};
use crate::handlers::{check_entity_id, parse_body};
use crate::mailer::OutboundEmail;
use crate::middleware::RequireSubscribersAdmin;
use crate::state::AppState;

/// Source recorded when the opt-in request does not name one.
const DEFAULT_SOURCE: &str = "website";

// ---------------------------------------------------------------------------
// Public opt-in / opt-out
// ---------------------------------------------------------------------------

/// POST /api/subscribers (public)
///
/// Idempotent: a new email creates a row (201); an already subscribed email
/// is a 200 no-op with the existing record; an unsubscribed email is
/// re-activated in place (200), never duplicated.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let input: SubscribeRequest = parse_body(raw)?;
    input.validate().map_err(CoreError::invalid)?;
    let email = normalize_email(&input.email);

    match SubscriberRepo::find_by_email(&state.pool, &email).await? {
        None => {
            let source = input.source.as_deref().unwrap_or(DEFAULT_SOURCE);
            let subscriber =
                SubscriberRepo::create(&state.pool, &email, &input.name, &input.interests, source)
                    .await?;
            tracing::info!(subscriber_id = %subscriber.id, "new subscriber");
            Ok((
                StatusCode::CREATED,
                Json(json!({"message": "Subscribed", "subscriber": subscriber})),
            ))
        }
        Some(existing) if existing.subscribed => Ok((
            StatusCode::OK,
            Json(json!({"message": "Already subscribed", "subscriber": existing})),
        )),
        Some(existing) => {
            let subscriber =
                SubscriberRepo::resubscribe(&state.pool, &existing.id, &input.name, &input.interests)
                    .await?
                    .ok_or_else(|| CoreError::not_found("Subscriber", &existing.id))?;
            tracing::info!(subscriber_id = %subscriber.id, "subscriber re-activated");
            Ok((
                StatusCode::OK,
                Json(json!({"message": "Subscription reactivated", "subscriber": subscriber})),
            ))
        }
    }
}

/// Request body for `POST /subscribers/unsubscribe`.
#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub token: String,
}

/// POST /api/subscribers/unsubscribe (public)
///
/// The token comes from an emailed link. Unknown tokens are 404; a token
/// whose stored expiry has passed is 410 and must be re-issued by a new
/// campaign send.
pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<serde_json::Value>> {
    let input: UnsubscribeRequest = parse_body(raw)?;
    if input.token.trim().is_empty() {
        return Err(AppError::Core(CoreError::invalid_field(
            "token",
            "is required",
        )));
    }

    let token_hash = hash_opaque_token(&input.token);
    let subscriber = SubscriberRepo::find_by_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| CoreError::not_found("Unsubscribe link", &input.token))?;

    let expired = match subscriber.unsubscribe_token_expires_at {
        Some(expires) => expires < chrono::Utc::now(),
        None => true,
    };
    if expired {
        return Err(AppError::Gone(
            "This unsubscribe link has expired. Use the link from a more recent email.".into(),
        ));
    }

    SubscriberRepo::unsubscribe(&state.pool, &subscriber.id).await?;
    tracing::info!(subscriber_id = %subscriber.id, "subscriber unsubscribed");
    Ok(Json(json!({"message": "Unsubscribed"})))
}

// ---------------------------------------------------------------------------
// Admin management
// ---------------------------------------------------------------------------

/// Query parameters accepted by `GET /subscribers`.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriberListQuery {
    pub subscribed: Option<String>,
    pub source: Option<String>,
    pub interest: Option<String>,
    pub limit: Option<i64>,
}

impl SubscriberListQuery {
    fn into_filter(self) -> SubscriberFilter {
        SubscriberFilter {
            subscribed: self.subscribed.as_deref().and_then(literal_bool),
            source: self.source,
            interest: self.interest,
            limit: clamp_limit(self.limit),
        }
    }
}

/// GET /api/subscribers
pub async fn list(
    RequireSubscribersAdmin(_user): RequireSubscribersAdmin,
    State(state): State<AppState>,
    Query(query): Query<SubscriberListQuery>,
) -> AppResult<Json<Vec<Subscriber>>> {
    let subscribers = SubscriberRepo::list(&state.pool, &query.into_filter()).await?;
    Ok(Json(subscribers))
}

/// GET /api/subscribers/id/{id}
pub async fn get_by_id(
    RequireSubscribersAdmin(_user): RequireSubscribersAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Subscriber>> {
    check_entity_id(&id)?;
    let subscriber = SubscriberRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("Subscriber", &id))?;
    Ok(Json(subscriber))
}

/// PATCH /api/subscribers/id/{id}
pub async fn update(
    RequireSubscribersAdmin(actor): RequireSubscribersAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<Json<Subscriber>> {
    check_entity_id(&id)?;
    let input: UpdateSubscriber = parse_body(raw)?;

    let subscriber = SubscriberRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Subscriber", &id))?;
    tracing::info!(subscriber_id = %subscriber.id, actor = %actor.user_id, "subscriber updated");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "subscriber",
            event: "updated",
            item_id: subscriber.id.clone(),
            label: subscriber.email.clone(),
            actor_id: actor.user_id,
            link: Some(format!("/admin/subscribers/{}", subscriber.id)),
        },
    );
    Ok(Json(subscriber))
}

/// DELETE /api/subscribers/id/{id}
pub async fn delete(
    RequireSubscribersAdmin(actor): RequireSubscribersAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    check_entity_id(&id)?;
    let subscriber = SubscriberRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("Subscriber", &id))?;

    SubscriberRepo::delete(&state.pool, &id).await?;
    tracing::info!(subscriber_id = %id, actor = %actor.user_id, "subscriber deleted");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "subscriber",
            event: "deleted",
            item_id: id,
            label: subscriber.email,
            actor_id: actor.user_id,
            link: None,
        },
    );
    Ok(Json(json!({"message": "Subscriber deleted"})))
}

// ---------------------------------------------------------------------------
// Campaigns
// ---------------------------------------------------------------------------

/// POST /api/subscribers/send-email
///
/// Resolves the audience, rotates each recipient's unsubscribe token,
/// delivers through the configured mailer, and records the campaign.
/// Per-recipient failures (token rotation, delivery, delivery stamping) are
/// logged and skipped, so a partial send still ends with a recorded campaign;
/// the row counts how many recipients were attempted.
pub async fn send_email(
    RequireSubscribersAdmin(actor): RequireSubscribersAdmin,
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<Campaign>)> {
    let input: SendCampaign = parse_body(raw)?;
    input.validate().map_err(CoreError::invalid)?;

    let recipients = SubscriberRepo::recipients(&state.pool, &input.filter).await?;
    let token_expiry = chrono::Utc::now()
        + chrono::Duration::days(state.config.unsubscribe_token_ttl_days);

    for recipient in &recipients {
        let (token, token_hash) = generate_opaque_token();
        if let Err(err) =
            SubscriberRepo::rotate_token(&state.pool, &recipient.id, &token_hash, token_expiry)
                .await
        {
            tracing::warn!(error = %err, recipient = %recipient.email,
                "unsubscribe token rotation failed, skipping recipient");
            continue;
        }

        let unsubscribe_url = format!(
            "{}/unsubscribe?token={token}",
            state.config.public_base_url
        );
        let email = OutboundEmail {
            to: recipient.email.clone(),
            subject: input.subject.clone(),
            html_body: format!(
                "{}\n<p><a href=\"{unsubscribe_url}\">Unsubscribe</a></p>",
                input.content
            ),
        };
        match state.mailer.send(&email).await {
            Ok(()) => {
                if let Err(err) =
                    SubscriberRepo::stamp_email_sent(&state.pool, &recipient.id).await
                {
                    tracing::warn!(error = %err, recipient = %recipient.email,
                        "failed to stamp delivery time");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, recipient = %recipient.email, "campaign delivery failed");
            }
        }
    }

    let campaign = CampaignRepo::create(
        &state.pool,
        &input.subject,
        &input.content,
        &input.filter,
        recipients.len() as i32,
        &actor.user_id,
    )
    .await?;
    tracing::info!(campaign_id = %campaign.id, recipients = recipients.len(),
        actor = %actor.user_id, "campaign sent");

    record_mutation(
        &state.pool,
        MutationRecord {
            entity: "campaign",
            event: "created",
            item_id: campaign.id.clone(),
            label: campaign.subject.clone(),
            actor_id: actor.user_id,
            link: Some(format!("/admin/campaigns/{}", campaign.id)),
        },
    );
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// Query parameters accepted by `GET /subscribers/campaigns`.
#[derive(Debug, Default, Deserialize)]
pub struct CampaignListQuery {
    pub limit: Option<i64>,
}

/// GET /api/subscribers/campaigns
pub async fn list_campaigns(
    RequireSubscribersAdmin(_user): RequireSubscribersAdmin,
    State(state): State<AppState>,
    Query(query): Query<CampaignListQuery>,
) -> AppResult<Json<Vec<Campaign>>> {
    let campaigns = CampaignRepo::list(&state.pool, clamp_limit(query.limit)).await?;
    Ok(Json(campaigns))
}

/// GET /api/subscribers/campaigns/id/{id}
pub async fn get_campaign(
    RequireSubscribersAdmin(_user): RequireSubscribersAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Campaign>> {
    check_entity_id(&id)?;
    let campaign = CampaignRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("Campaign", &id))?;
    Ok(Json(campaign))
}

/// DELETE /api/subscribers/campaigns/id/{id}
pub async fn delete_campaign(
    RequireSubscribersAdmin(actor): RequireSubscribersAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    check_entity_id(&id)?;
    if !CampaignRepo::delete(&state.pool, &id).await? {
        return Err(AppError::Core(CoreError::not_found("Campaign", &id)));
    }
    tracing::info!(campaign_id = %id, actor = %actor.user_id, "campaign deleted");
    Ok(Json(json!({"message": "Campaign deleted"})))
}
