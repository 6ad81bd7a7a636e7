//! HTTP API modules.
//!
//! One module per resource; each exposes a `router()` merged into the
//! application router by `core::server::build_app`.

pub mod auth;
pub mod health;
pub mod images;

// Type registries + archives
pub mod activity_types;
pub mod archived_activity_types;
pub mod archived_club_types;
pub mod club_types;

// Memberships
pub mod activities;
pub mod clubs;

// Events + registrations
pub mod events;
pub mod registrations;

// Reviews
pub mod reviews;

// Users
pub mod users;

// Dashboard
pub mod dashboard;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
