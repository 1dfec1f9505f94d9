//! Subscriber opt-in/opt-out, campaign sends, and the delivery webhook
//! against live PostgreSQL.
//!
//! Ignored by default; run with `cargo test -- --ignored` when
//! `DATABASE_URL` points at a dev cluster.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tower::ServiceExt;

use backlot_api::auth::jwt::generate_opaque_token;
use backlot_api::mailer::{Mailer, MailerError, OutboundEmail};
use backlot_api::router::build_app_router;
use backlot_api::state::AppState;
use backlot_db::models::user::NewUser;
use backlot_db::repositories::{SubscriberRepo, UserRepo};

async fn seed_admin(pool: &PgPool) -> String {
    let user = UserRepo::create(
        pool,
        &NewUser {
            name: "Admin".into(),
            email: "admin@example.com".into(),
            password_hash: None,
            image: None,
            google_id: None,
            role: "admin".into(),
        },
    )
    .await
    .expect("user insert");
    let id = user.id;
    common::mint_token(&id, "admin")
}

async fn subscribe(pool: &PgPool, email: &str) -> (StatusCode, serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/subscribers",
        serde_json::json!({"email": email}),
    )
    .await;
    let status = response.status();
    (status, common::body_json(response).await)
}

async fn webhook_event(
    pool: &PgPool,
    campaign_id: &str,
    event: &str,
    count: Option<i32>,
) -> StatusCode {
    let mut body = serde_json::json!({"campaignId": campaign_id, "event": event});
    if let Some(count) = count {
        body["count"] = serde_json::json!(count);
    }
    let app = common::build_test_app(pool.clone());
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhooks/email")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-webhook-secret", common::TEST_WEBHOOK_SECRET)
        .body(Body::from(body.to_string()))
        .expect("request builds");
    let response = app.oneshot(request).await.expect("router is infallible");
    response.status()
}

// ---------------------------------------------------------------------------
// Opt-in
// ---------------------------------------------------------------------------

#[ignore]
#[sqlx::test(migrations = "../db/migrations")]
async fn subscribe_is_idempotent_and_reactivates(pool: PgPool) {
    let (status, json) = subscribe(&pool, "Fan@Example.com").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Subscribed");
    assert_eq!(json["subscriber"]["email"], "fan@example.com");
    assert_eq!(json["subscriber"]["source"], "website");
    let id = json["subscriber"]["id"].as_str().expect("id").to_string();

    // Same address again: no new row, no error.
    let (status, json) = subscribe(&pool, "fan@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Already subscribed");

    // Opt the row out, then subscribe again: reactivation, same row.
    SubscriberRepo::unsubscribe(&pool, &id)
        .await
        .expect("unsubscribe");
    let (status, json) = subscribe(&pool, "fan@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Subscription reactivated");
    assert_eq!(json["subscriber"]["id"], id.as_str());
    assert_eq!(json["subscriber"]["subscribed"], true);
}

// ---------------------------------------------------------------------------
// Opt-out
// ---------------------------------------------------------------------------

async fn seed_unsubscribe_token(pool: &PgPool, id: &str, hours_from_now: i64) -> String {
    let (token, hash) = generate_opaque_token();
    SubscriberRepo::rotate_token(pool, id, &hash, Utc::now() + Duration::hours(hours_from_now))
        .await
        .expect("token rotate");
    token
}

#[ignore]
#[sqlx::test(migrations = "../db/migrations")]
async fn unsubscribe_token_outcomes(pool: PgPool) {
    let (_, json) = subscribe(&pool, "fan@example.com").await;
    let id = json["subscriber"]["id"].as_str().expect("id").to_string();

    // Unknown token.
    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/subscribers/unsubscribe",
        serde_json::json!({"token": "no-such-token"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Expired token.
    let expired = seed_unsubscribe_token(&pool, &id, -1).await;
    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/subscribers/unsubscribe",
        serde_json::json!({"token": expired}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::GONE);

    // Live token actually opts out.
    let live = seed_unsubscribe_token(&pool, &id, 24).await;
    let app = common::build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/subscribers/unsubscribe",
        serde_json::json!({"token": live}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let subscriber = SubscriberRepo::find_by_id(&pool, &id)
        .await
        .expect("lookup")
        .expect("exists");
    assert!(!subscriber.subscribed);
    assert!(subscriber.unsubscribed_at.is_some());
}

// ---------------------------------------------------------------------------
// Campaigns and the delivery webhook
// ---------------------------------------------------------------------------

#[ignore]
#[sqlx::test(migrations = "../db/migrations")]
async fn campaign_send_targets_subscribed_recipients(pool: PgPool) {
    let token = seed_admin(&pool).await;

    subscribe(&pool, "one@example.com").await;
    subscribe(&pool, "two@example.com").await;
    let (_, json) = subscribe(&pool, "gone@example.com").await;
    let gone_id = json["subscriber"]["id"].as_str().expect("id").to_string();
    SubscriberRepo::unsubscribe(&pool, &gone_id)
        .await
        .expect("unsubscribe");

    let app = common::build_test_app(pool.clone());
    let response = common::post_json_auth(
        app,
        "/api/subscribers/send-email",
        &token,
        serde_json::json!({"subject": "Premiere night", "content": "<p>Save the date.</p>"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let campaign = common::body_json(response).await;
    assert_eq!(campaign["status"], "sent");
    assert_eq!(campaign["recipientCount"], 2);
    assert!(campaign["delivered"].is_null());
    let campaign_id = campaign["id"].as_str().expect("id").to_string();

    // The send stamps last_email_sent and rotates unsubscribe tokens on
    // every recipient.
    let one = SubscriberRepo::find_by_email(&pool, "one@example.com")
        .await
        .expect("lookup")
        .expect("exists");
    assert!(one.last_email_sent.is_some());
    assert!(one.unsubscribe_token_hash.is_some());
    let gone = SubscriberRepo::find_by_id(&pool, &gone_id)
        .await
        .expect("lookup")
        .expect("exists");
    assert!(gone.last_email_sent.is_none());

    // Webhook events accumulate on the campaign row.
    assert_eq!(
        webhook_event(&pool, &campaign_id, "delivered", Some(2)).await,
        StatusCode::OK
    );
    assert_eq!(
        webhook_event(&pool, &campaign_id, "opened", None).await,
        StatusCode::OK
    );
    assert_eq!(
        webhook_event(&pool, &campaign_id, "opened", None).await,
        StatusCode::OK
    );

    let app = common::build_test_app(pool.clone());
    let response = common::get_auth(
        app,
        &format!("/api/subscribers/campaigns/id/{campaign_id}"),
        &token,
    )
    .await;
    let json = common::body_json(response).await;
    assert_eq!(json["delivered"], 2);
    assert_eq!(json["opened"], 2);
    assert!(json["clicked"].is_null());

    // Unknown campaign id is a 404 even with a valid secret.
    assert_eq!(
        webhook_event(&pool, &common::ghost_id(), "delivered", None).await,
        StatusCode::NOT_FOUND
    );
}

/// Mailer that refuses messages addressed to anything containing "bounce".
struct BouncingMailer;

#[async_trait]
impl Mailer for BouncingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        if email.to.contains("bounce") {
            return Err(MailerError("mailbox unavailable".into()));
        }
        Ok(())
    }
}

fn app_with_bouncing_mailer(pool: PgPool) -> Router {
    let config = common::test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: Arc::new(BouncingMailer),
    };
    build_app_router(state, &config)
}

#[ignore]
#[sqlx::test(migrations = "../db/migrations")]
async fn campaign_send_outlives_per_recipient_failures(pool: PgPool) {
    let token = seed_admin(&pool).await;
    subscribe(&pool, "ok@example.com").await;
    subscribe(&pool, "bounce@example.com").await;

    let app = app_with_bouncing_mailer(pool.clone());
    let response = common::post_json_auth(
        app,
        "/api/subscribers/send-email",
        &token,
        serde_json::json!({"subject": "Hello", "content": "World"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let campaign = common::body_json(response).await;
    assert_eq!(campaign["status"], "sent");
    assert_eq!(campaign["recipientCount"], 2);

    // Delivery is stamped only where the mailer accepted the message; the
    // failed recipient still holds a rotated token for the next attempt.
    let delivered = SubscriberRepo::find_by_email(&pool, "ok@example.com")
        .await
        .expect("lookup")
        .expect("exists");
    assert!(delivered.last_email_sent.is_some());
    let bounced = SubscriberRepo::find_by_email(&pool, "bounce@example.com")
        .await
        .expect("lookup")
        .expect("exists");
    assert!(bounced.last_email_sent.is_none());
    assert!(bounced.unsubscribe_token_hash.is_some());
}

#[ignore]
#[sqlx::test(migrations = "../db/migrations")]
async fn campaign_list_and_delete(pool: PgPool) {
    let token = seed_admin(&pool).await;
    subscribe(&pool, "fan@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = common::post_json_auth(
        app,
        "/api/subscribers/send-email",
        &token,
        serde_json::json!({"subject": "Hello", "content": "World"}),
    )
    .await;
    let campaign_id = common::body_json(response).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    let app = common::build_test_app(pool.clone());
    let response = common::get_auth(app, "/api/subscribers/campaigns", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json.as_array().expect("array").len(), 1);

    let app = common::build_test_app(pool.clone());
    let response = common::delete_auth(
        app,
        &format!("/api/subscribers/campaigns/id/{campaign_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = common::delete_auth(
        app,
        &format!("/api/subscribers/campaigns/id/{campaign_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Admin roster
// ---------------------------------------------------------------------------

#[ignore]
#[sqlx::test(migrations = "../db/migrations")]
async fn roster_filters_by_subscription_state(pool: PgPool) {
    let token = seed_admin(&pool).await;
    subscribe(&pool, "active@example.com").await;
    let (_, json) = subscribe(&pool, "inactive@example.com").await;
    let id = json["subscriber"]["id"].as_str().expect("id").to_string();
    SubscriberRepo::unsubscribe(&pool, &id)
        .await
        .expect("unsubscribe");

    let app = common::build_test_app(pool.clone());
    let response = common::get_auth(app, "/api/subscribers?subscribed=true", &token).await;
    let json = common::body_json(response).await;
    let list = json.as_array().expect("array");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["email"], "active@example.com");
}
