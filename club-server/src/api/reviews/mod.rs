//! Review API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reviews", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/event/{event_id}", get(handler::list_by_event))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
}
