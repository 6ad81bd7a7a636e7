//! Dashboard API Handlers

use axum::{Json, extract::State};
use shared::DashboardStats;

use crate::core::ServerState;
use crate::services::DashboardService;
use crate::utils::AppResult;

/// GET /api/dashboard/stats - aggregate payload at current store state
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<DashboardStats>> {
    let stats = DashboardService::new(state.get_db()).collect().await?;
    Ok(Json(stats))
}

/// POST /api/dashboard/refresh - recompute and broadcast to all Socket.IO
/// subscribers, then return the payload
pub async fn refresh(State(state): State<ServerState>) -> AppResult<Json<DashboardStats>> {
    let stats = DashboardService::new(state.get_db()).collect().await?;
    state.dashboard.broadcast_stats(&stats).await;
    Ok(Json(stats))
}
