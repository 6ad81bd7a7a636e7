//! Server Implementation
//!
//! HTTP server startup: router assembly, middleware stack, Socket.IO layer
//! and background tasks.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, ServerState};
use crate::utils::AppError;

/// HTTP request log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();
    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        .merge(crate::api::images::router())
        // Type registries + archives
        .merge(crate::api::club_types::router())
        .merge(crate::api::activity_types::router())
        .merge(crate::api::archived_club_types::router())
        .merge(crate::api::archived_activity_types::router())
        // Memberships
        .merge(crate::api::clubs::router())
        .merge(crate::api::activities::router())
        // Events + registrations
        .merge(crate::api::events::router())
        .merge(crate::api::registrations::router())
        // Reviews
        .merge(crate::api::reviews::router())
        // Users
        .merge(crate::api::users::router())
        // Dashboard
        .merge(crate::api::dashboard::router())
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        // Background tasks: periodic event expiration sweep
        let mut tasks = BackgroundTasks::new();
        let expiration = state.expiration.clone();
        tasks.spawn_periodic(
            "event_expiration_sweep",
            Duration::from_secs(self.config.expiration_interval_secs),
            move || {
                let sweep = expiration.clone();
                async move {
                    if let Err(e) = sweep.check_expired_events().await {
                        tracing::error!(error = %e, "Expiration sweep failed");
                    }
                }
            },
        );

        // Socket.IO dashboard channel
        let socket_layer = state.dashboard.initialize(state.clone());

        let app = build_app()
            // JWT auth middleware; public routes are skipped inside
            .layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
            .layer(socket_layer)
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            .layer(middleware::from_fn(log_request));

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Club server listening on http://{}", addr);

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

        tasks.shutdown().await;
        Ok(())
    }
}
