//! Route registration, one module per resource.

pub mod activity;
pub mod auth;
pub mod films;
pub mod health;
pub mod notifications;
pub mod productions;
pub mod settings;
pub mod stories;
pub mod subscribers;
pub mod upload;
pub mod users;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                         login (public)
/// /auth/refresh                       rotate refresh token (public)
/// /auth/logout                        revoke session (public, idempotent)
/// /auth/me                            current user (auth)
///
/// /films                              list (public), create (content)
/// /films/id/{id}                      get (public), patch (content), delete (admin)
/// /films/{slug}                       get (public); PATCH/DELETE are 405
/// /productions, /stories              same shape as /films
///
/// /users                              list, create (admin)
/// /users/id/{id}                      get, patch, delete (admin)
///
/// /subscribers                        opt-in (public), list (admin)
/// /subscribers/unsubscribe            token opt-out (public)
/// /subscribers/send-email             trigger campaign (admin)
/// /subscribers/campaigns              list (admin)
/// /subscribers/campaigns/id/{id}      get, delete (admin)
/// /subscribers/id/{id}                get, patch, delete (admin)
///
/// /notifications                      inbox page (auth), mark read (auth)
/// /settings                           get (public), put (content)
/// /activity                           audit feed (admin)
/// /stats                              dashboard counts (admin)
/// /upload                             media upload (content)
/// /webhooks/email                     delivery events (shared secret)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(films::router())
        .merge(productions::router())
        .merge(stories::router())
        .merge(users::router())
        .merge(subscribers::router())
        .merge(notifications::router())
        .merge(settings::router())
        .merge(activity::router())
        .merge(upload::router())
        .merge(webhooks::router())
}
