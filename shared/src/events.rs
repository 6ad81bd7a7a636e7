//! Socket.IO event names shared with the dashboard frontend.

/// Sent by a client to request the current dashboard payload.
pub const SUBSCRIBE_DASHBOARD: &str = "subscribeToDashboard";

/// Broadcast by the server with a full [`crate::DashboardStats`] payload.
pub const DASHBOARD_DATA: &str = "dashboardData";

/// Broadcast by the server when stats collection fails.
pub const DASHBOARD_ERROR: &str = "error";
