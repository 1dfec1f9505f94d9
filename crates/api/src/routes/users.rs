use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/id/{id}",
            get(users::get_by_id)
                .patch(users::update)
                .delete(users::delete),
        )
}
