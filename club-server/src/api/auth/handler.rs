//! Authentication Handlers
//!
//! Login issues a JWT carrying the account's identity and admin flag. One
//! bootstrap `Admin`/`Admin` account exists outside the user table and is
//! the only admin-flagged principal.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::{ADMIN_SUBJECT, CurrentUser};
use crate::core::ServerState;
use crate::db::models::User;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

const ADMIN_LOGIN: &str = "Admin";
const ADMIN_PASSWORD: &str = "Admin";

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// User information returned after login
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub matricule: String,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: String,
    pub residence_administrative: String,
    pub is_admin: bool,
}

/// Login response with JWT token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserInfo,
    pub redirect_to: &'static str,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if req.login == ADMIN_LOGIN && req.password == ADMIN_PASSWORD {
        tracing::info!(target: "security", "Bootstrap admin logged in");
        return issue(&state, admin_principal(), admin_info());
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_login(&req.login)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !password_valid {
        tracing::warn!(target: "security", login = %req.login, "Failed login attempt");
        return Err(AppError::invalid_credentials());
    }

    let principal = user_principal(&user);
    let info = user_info(&user);
    tracing::info!(target: "security", user_id = %principal.id, login = %user.login, "User logged in");
    issue(&state, principal, info)
}

fn issue(
    state: &ServerState,
    principal: CurrentUser,
    user: UserInfo,
) -> AppResult<Json<LoginResponse>> {
    let token = state
        .get_jwt_service()
        .generate_token(&principal)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    let redirect_to = if principal.is_admin {
        "/admin"
    } else {
        "/personnel"
    };

    Ok(Json(LoginResponse {
        access_token: token,
        user,
        redirect_to,
    }))
}

fn admin_principal() -> CurrentUser {
    CurrentUser {
        id: ADMIN_SUBJECT.to_string(),
        username: ADMIN_LOGIN.to_string(),
        matricule: "ADMIN-001".to_string(),
        nom: "Admin".to_string(),
        prenom: "Super".to_string(),
        is_admin: true,
    }
}

fn admin_info() -> UserInfo {
    UserInfo {
        id: ADMIN_SUBJECT.to_string(),
        matricule: "ADMIN-001".to_string(),
        nom: "Admin".to_string(),
        prenom: "Super".to_string(),
        email: "admin@espace-club.tn".to_string(),
        telephone: "+216 71 123 456".to_string(),
        residence_administrative: "Direction".to_string(),
        is_admin: true,
    }
}

fn user_principal(user: &User) -> CurrentUser {
    CurrentUser {
        id: user.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        username: user.login.clone(),
        matricule: user.matricule.clone(),
        nom: user.nom.clone(),
        prenom: user.prenom.clone(),
        is_admin: false,
    }
}

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        matricule: user.matricule.clone(),
        nom: user.nom.clone(),
        prenom: user.prenom.clone(),
        email: user.email.clone(),
        telephone: user.telephone.clone(),
        residence_administrative: user.residence_administrative.clone(),
        is_admin: false,
    }
}
