use axum::routing::get;
use axum::Router;

use crate::handlers::{deprecated_slug_mutation, stories};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stories", get(stories::list).post(stories::create))
        .route(
            "/stories/id/{id}",
            get(stories::get_by_id)
                .patch(stories::update)
                .delete(stories::delete),
        )
        .route(
            "/stories/{slug}",
            get(stories::get_by_slug)
                .patch(deprecated_slug_mutation)
                .delete(deprecated_slug_mutation),
        )
}
