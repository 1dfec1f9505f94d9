//! Routing, auth-gate, and validation tests that never touch the database.
//!
//! These run against a lazily-connecting pool: every path under test fails
//! or succeeds before any query is issued.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete, get, get_auth, ghost_id, lazy_pool, mint_token, patch_json,
    patch_json_auth, post_json, post_json_auth, put_json_auth,
};

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_stays_200_when_the_database_is_down() {
    let app = common::build_test_app(lazy_pool());
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["dbHealthy"], false);
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Authentication gates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_mutations_require_a_token() {
    let app = common::build_test_app(lazy_pool());
    let response = post_json(app, "/api/films", serde_json::json!({"title": "X"})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(lazy_pool());
    let response = delete(app, &format!("/api/films/id/{}", ghost_id())).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_401() {
    let app = common::build_test_app(lazy_pool());
    let response = get_auth(app, "/api/notifications", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_role_in_token_is_401() {
    let token = mint_token(&ghost_id(), "superuser");
    let app = common::build_test_app(lazy_pool());
    let response = get_auth(app, "/api/notifications", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_editor_cannot_reach_admin_routes() {
    let token = mint_token(&ghost_id(), "editor");

    for uri in [
        "/api/users",
        "/api/subscribers",
        "/api/subscribers/campaigns",
        "/api/activity",
        "/api/stats",
    ] {
        let app = common::build_test_app(lazy_pool());
        let response = get_auth(app, uri, &token).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "GET {uri}");
    }
}

#[tokio::test]
async fn test_editor_cannot_delete_content() {
    let token = mint_token(&ghost_id(), "editor");
    let app = common::build_test_app(lazy_pool());
    let response =
        common::delete_auth(app, &format!("/api/films/id/{}", ghost_id()), &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Deprecated slug mutations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_slug_mutations_are_405_with_guidance() {
    for entity in ["films", "productions", "stories"] {
        let app = common::build_test_app(lazy_pool());
        let response = patch_json(
            app,
            &format!("/api/{entity}/some-slug"),
            serde_json::json!({"title": "New"}),
        )
        .await;
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "PATCH /{entity}/{{slug}}"
        );
        let json = body_json(response).await;
        assert!(
            json["error"].as_str().unwrap_or_default().contains("/id/"),
            "guidance should point at the id route"
        );

        let app = common::build_test_app(lazy_pool());
        let response = delete(app, &format!("/api/{entity}/some-slug")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

// ---------------------------------------------------------------------------
// Id format and strict schemas
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_malformed_id_is_400_before_store_access() {
    for bad in ["abc", "5F2B8C9D1E3A4F5B6C7D8E9F", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
        let app = common::build_test_app(lazy_pool());
        let response = get(app, &format!("/api/films/id/{bad}")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "id {bad}");
        let json = body_json(response).await;
        assert!(json["issues"]["id"].is_string());
    }
}

#[tokio::test]
async fn test_user_patch_rejects_undeclared_fields() {
    let token = mint_token(&ghost_id(), "admin");

    for field in ["email", "password", "id"] {
        let app = common::build_test_app(lazy_pool());
        let response = patch_json_auth(
            app,
            &format!("/api/users/id/{}", ghost_id()),
            &token,
            serde_json::json!({field: "x"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {field}");
    }
}

#[tokio::test]
async fn test_film_patch_rejects_id_field() {
    let token = mint_token(&ghost_id(), "editor");
    let app = common::build_test_app(lazy_pool());
    let response = patch_json_auth(
        app,
        &format!("/api/films/id/{}", ghost_id()),
        &token,
        serde_json::json!({"title": "New", "id": ghost_id()}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Validation issue maps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_film_create_reports_every_bad_field() {
    let token = mint_token(&ghost_id(), "editor");
    let app = common::build_test_app(lazy_pool());
    let response = post_json_auth(
        app,
        "/api/films",
        &token,
        serde_json::json!({
            "title": "X",
            "slug": "Bad Slug",
            "category": "Doc",
            "year": "24",
            "description": "aaaaaaaaaa",
            "image": "not-a-url",
            "director": "D",
            "producer": "P",
            "duration": "90m",
            "releaseDate": "2024-01-01",
            "synopsis": "bbbbbbbbbb",
            "rating": 7.5
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    for field in ["slug", "year", "image", "rating"] {
        assert!(json["issues"][field].is_string(), "missing issue for {field}");
    }
}

#[tokio::test]
async fn test_subscribe_requires_valid_email() {
    let app = common::build_test_app(lazy_pool());
    let response = post_json(
        app,
        "/api/subscribers",
        serde_json::json!({"email": "nope"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["issues"]["email"].is_string());
}

#[tokio::test]
async fn test_campaign_send_requires_subject_and_content() {
    let token = mint_token(&ghost_id(), "admin");
    let app = common::build_test_app(lazy_pool());
    let response = post_json_auth(
        app,
        "/api/subscribers/send-email",
        &token,
        serde_json::json!({"subject": "", "content": " "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["issues"]["subject"].is_string());
    assert!(json["issues"]["content"].is_string());
}

#[tokio::test]
async fn test_settings_put_requires_site_name() {
    let token = mint_token(&ghost_id(), "editor");
    let app = common::build_test_app(lazy_pool());
    let response = put_json_auth(
        app,
        "/api/settings",
        &token,
        serde_json::json!({"siteDescription": "missing the name"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Notification body shapes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_notifications_patch_rejects_bad_shapes() {
    let token = mint_token(&ghost_id(), "editor");

    // Neither "all" nor an id array.
    let app = common::build_test_app(lazy_pool());
    let response = patch_json_auth(
        app,
        "/api/notifications",
        &token,
        serde_json::json!({"ids": 42}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A keyword other than "all".
    let app = common::build_test_app(lazy_pool());
    let response = patch_json_auth(
        app,
        "/api/notifications",
        &token,
        serde_json::json!({"ids": "everything"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A malformed id inside the set.
    let app = common::build_test_app(lazy_pool());
    let response = patch_json_auth(
        app,
        "/api/notifications",
        &token,
        serde_json::json!({"ids": [ghost_id(), "nope"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Webhook shared secret
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_webhook_rejects_bad_secret() {
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    let app = common::build_test_app(lazy_pool());
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhooks/email")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-webhook-secret", "wrong")
        .body(Body::from(
            serde_json::json!({"campaignId": ghost_id(), "event": "delivered"}).to_string(),
        ))
        .expect("request builds");
    let response = app.oneshot(request).await.expect("router is infallible");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Missing header entirely.
    let app = common::build_test_app(lazy_pool());
    let response = post_json(
        app,
        "/api/webhooks/email",
        serde_json::json!({"campaignId": ghost_id(), "event": "delivered"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_rejects_unknown_event() {
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    let app = common::build_test_app(lazy_pool());
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhooks/email")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-webhook-secret", common::TEST_WEBHOOK_SECRET)
        .body(Body::from(
            serde_json::json!({"campaignId": ghost_id(), "event": "forwarded"}).to_string(),
        ))
        .expect("request builds");
    let response = app.oneshot(request).await.expect("router is infallible");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["issues"]["event"].is_string());
}
