//! Account and message routes.

use crate::handlers::{account, message};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(account::register))
        .route("/login", post(account::login))
        .route("/messages", get(message::list).post(message::create))
        .route(
            "/messages/:id",
            get(message::read).patch(message::update).delete(message::delete),
        )
        .route("/accounts/:id/messages", get(message::list_by_account))
        .with_state(state)
}
