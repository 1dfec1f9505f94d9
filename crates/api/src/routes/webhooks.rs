use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/webhooks/email", post(webhooks::email_event))
}
