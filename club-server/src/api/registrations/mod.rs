//! Event registration API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/registrations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/check/{event_id}/{user_id}", get(handler::check))
        .route("/{id}", get(handler::get_by_id).put(handler::update).delete(handler::delete))
}
