//! Authentication middleware.
//!
//! Axum middleware for JWT authentication and admin-only routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// Whether a request may pass without a bearer token.
///
/// - CORS preflight requests
/// - anything outside `/api/` (static frontend assets, 404s)
/// - login and the health check
/// - self-service account registration
/// - uploaded image serving
fn is_public_route(method: &http::Method, path: &str) -> bool {
    if method == http::Method::OPTIONS {
        return true;
    }
    if !path.starts_with("/api/") {
        return true;
    }
    if path == "/api/auth/login" || path == "/api/health" {
        return true;
    }
    if path == "/api/users" && method == http::Method::POST {
        return true;
    }
    if path.starts_with("/api/image/") && method == http::Method::GET {
        return true;
    }
    false
}

/// Authentication middleware - requires a valid bearer token.
///
/// On success the parsed [`CurrentUser`] is injected into the request
/// extensions for downstream handlers.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();

    if is_public_route(req.method(), &path) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(target: "security", uri = %path, "Missing authorization header");
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %path, "Token validation failed");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Admin middleware - requires `CurrentUser::is_admin`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;

    if !user.is_admin() {
        tracing::warn!(
            target: "security",
            user_id = %user.id,
            username = %user.username,
            "Admin-only route refused"
        );
        return Err(AppError::forbidden(
            "Seul un administrateur peut effectuer cette action",
        ));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_and_registration_are_public() {
        assert!(is_public_route(&http::Method::POST, "/api/auth/login"));
        assert!(is_public_route(&http::Method::POST, "/api/users"));
        assert!(!is_public_route(&http::Method::GET, "/api/users"));
    }

    #[test]
    fn image_serving_is_public_but_upload_is_not() {
        assert!(is_public_route(&http::Method::GET, "/api/image/abc.jpg"));
        assert!(!is_public_route(&http::Method::POST, "/api/image/upload"));
    }

    #[test]
    fn api_routes_require_auth() {
        assert!(!is_public_route(&http::Method::GET, "/api/clubs"));
        assert!(!is_public_route(&http::Method::DELETE, "/api/club-types/x"));
        assert!(is_public_route(&http::Method::OPTIONS, "/api/clubs"));
        assert!(is_public_route(&http::Method::GET, "/"));
    }
}
