//! Club Server - administrative back end for the sports-club and
//! event-registration system.
//!
//! # Module structure
//!
//! ```text
//! club-server/src/
//! ├── core/      # config, state, HTTP server, background tasks
//! ├── auth/      # JWT authentication, middleware
//! ├── db/        # embedded SurrealDB models and repositories
//! ├── api/       # HTTP routes and handlers, one module per resource
//! ├── services/  # mailer, sentiment client, images, expiration, dashboard
//! ├── realtime/  # Socket.IO dashboard channel
//! └── utils/     # errors, logging, validation helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod realtime;
pub mod services;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and make sure the work directory exists. Called once from
/// `main` before anything else.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    Ok(())
}
