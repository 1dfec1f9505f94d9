use axum::routing::get;
use axum::Router;

use crate::handlers::{deprecated_slug_mutation, productions};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/productions",
            get(productions::list).post(productions::create),
        )
        .route(
            "/productions/id/{id}",
            get(productions::get_by_id)
                .patch(productions::update)
                .delete(productions::delete),
        )
        .route(
            "/productions/{slug}",
            get(productions::get_by_slug)
                .patch(deprecated_slug_mutation)
                .delete(deprecated_slug_mutation),
        )
}
