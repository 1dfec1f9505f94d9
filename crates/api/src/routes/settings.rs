use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/settings", get(settings::get).put(settings::update))
}
