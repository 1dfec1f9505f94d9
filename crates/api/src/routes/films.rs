use axum::routing::get;
use axum::Router;

use crate::handlers::{deprecated_slug_mutation, films};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/films", get(films::list).post(films::create))
        .route(
            "/films/id/{id}",
            get(films::get_by_id)
                .patch(films::update)
                .delete(films::delete),
        )
        .route(
            "/films/{slug}",
            get(films::get_by_slug)
                .patch(deprecated_slug_mutation)
                .delete(deprecated_slug_mutation),
        )
}
