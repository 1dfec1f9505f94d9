use axum::routing::{get, post};
use axum::Router;

use crate::handlers::subscribers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/subscribers",
            post(subscribers::subscribe).get(subscribers::list),
        )
        .route("/subscribers/unsubscribe", post(subscribers::unsubscribe))
        .route("/subscribers/send-email", post(subscribers::send_email))
        .route("/subscribers/campaigns", get(subscribers::list_campaigns))
        .route(
            "/subscribers/campaigns/id/{id}",
            get(subscribers::get_campaign).delete(subscribers::delete_campaign),
        )
        .route(
            "/subscribers/id/{id}",
            get(subscribers::get_by_id)
                .patch(subscribers::update)
                .delete(subscribers::delete),
        )
}
