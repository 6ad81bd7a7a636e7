//! Authentication: JWT issuance/validation and Axum middleware.

pub mod jwt;
pub mod middleware;

pub use jwt::{ADMIN_SUBJECT, Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
