use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::upload;
use crate::state::AppState;

/// Router body-size backstop, slightly above the handler's 5 MB cap so an
/// oversized file gets the handler's 400 instead of a generic 413.
const BODY_LIMIT_BYTES: usize = 6 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload::upload))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}
