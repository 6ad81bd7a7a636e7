//! Shared wire contract between the club administration server and its
//! clients (web dashboard, Socket.IO subscribers).
//!
//! Everything in this crate is serialization-only: payload shapes and event
//! names. No business logic lives here.

pub mod events;
pub mod sentiment;
pub mod stats;

pub use sentiment::Sentiment;
pub use stats::DashboardStats;
