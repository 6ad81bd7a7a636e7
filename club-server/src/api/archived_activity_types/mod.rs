//! Archived sport-activity type API module (read-only)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/archived-activity-types", get(handler::list))
        .route(
            "/api/archived-activity-types/by-type/{type_id}",
            get(handler::get_by_type),
        )
}
