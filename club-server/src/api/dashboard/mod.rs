//! Dashboard API module

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/dashboard/stats", get(handler::stats))
        .route(
            "/api/dashboard/refresh",
            post(handler::refresh).layer(middleware::from_fn(require_admin)),
        )
}
