//! Socket.IO dashboard channel.
//!
//! Clients emit `subscribeToDashboard`; the server recomputes the aggregate
//! payload and broadcasts `dashboardData` to every connected client. The
//! same broadcast is reused by the explicit refresh endpoint. No
//! per-subscriber filtering, no back-pressure handling.

use std::sync::{Arc, RwLock};

use serde_json::json;
use shared::DashboardStats;
use shared::events;
use socketioxide::extract::{SocketRef, State};
use socketioxide::layer::SocketIoLayer;
use socketioxide::SocketIo;

use crate::core::ServerState;
use crate::services::DashboardService;

/// Socket.IO gateway. Created empty and initialized once the full
/// [`ServerState`] exists, mirroring the two-phase router setup.
#[derive(Clone, Default)]
pub struct DashboardGateway {
    io: Arc<RwLock<Option<SocketIo>>>,
}

impl DashboardGateway {
    pub fn new() -> Self {
        Self {
            io: Arc::new(RwLock::new(None)),
        }
    }

    /// Build the Socket.IO layer bound to the server state and register the
    /// namespace handlers. Must be called once during server startup.
    pub fn initialize(&self, state: ServerState) -> SocketIoLayer {
        let (layer, io) = SocketIo::builder().with_state(state).build_layer();
        io.ns("/", on_connect);

        let mut slot = self.io.write().expect("Failed to lock Socket.IO handle");
        *slot = Some(io);

        layer
    }

    /// Broadcast a stats payload to every connected client.
    pub async fn broadcast_stats(&self, stats: &DashboardStats) {
        let io = self
            .io
            .read()
            .expect("Failed to lock Socket.IO handle")
            .clone();
        if let Some(io) = io
            && let Err(e) = io.emit(events::DASHBOARD_DATA, stats).await
        {
            tracing::warn!(error = %e, "Failed to broadcast dashboard data");
        }
    }

    /// Broadcast a generic failure notice. The cause stays in the logs.
    pub async fn broadcast_error(&self, message: &str) {
        let io = self
            .io
            .read()
            .expect("Failed to lock Socket.IO handle")
            .clone();
        if let Some(io) = io
            && let Err(e) = io
                .emit(events::DASHBOARD_ERROR, &json!({ "message": message }))
                .await
        {
            tracing::warn!(error = %e, "Failed to broadcast dashboard error");
        }
    }
}

async fn on_connect(socket: SocketRef) {
    tracing::info!(socket_id = %socket.id, "Dashboard client connected");
    socket.on(events::SUBSCRIBE_DASHBOARD, on_subscribe);
    socket.on_disconnect(|socket: SocketRef| async move {
        tracing::info!(socket_id = %socket.id, "Dashboard client disconnected");
    });
}

async fn on_subscribe(_socket: SocketRef, State(state): State<ServerState>) {
    match DashboardService::new(state.get_db()).collect().await {
        Ok(stats) => state.dashboard.broadcast_stats(&stats).await,
        Err(e) => {
            tracing::error!(error = %e, "Failed to collect dashboard stats");
            state
                .dashboard
                .broadcast_error("Impossible de récupérer les données")
                .await;
        }
    }
}
