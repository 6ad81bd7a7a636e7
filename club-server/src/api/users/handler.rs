//! User API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

fn repo(state: &ServerState) -> UserRepository {
    UserRepository::new(state.get_db())
}

/// GET /api/users - admin only
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<User>>> {
    if !current_user.is_admin() {
        return Err(AppError::forbidden(
            "Seul un administrateur peut consulter les comptes",
        ));
    }
    let users = repo(&state).find_all().await?;
    Ok(Json(users))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = repo(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Utilisateur non trouvé"))?;
    Ok(Json(user))
}

/// POST /api/users - public self-service registration
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user = repo(&state).create(payload).await?;
    tracing::info!(login = %user.login, "User account created");
    Ok(Json(user))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    let repo = repo(&state);
    let mut user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Utilisateur non trouvé"))?;

    if let Some(matricule) = payload.matricule {
        user.matricule = matricule;
    }
    if let Some(nom) = payload.nom {
        user.nom = nom;
    }
    if let Some(prenom) = payload.prenom {
        user.prenom = prenom;
    }
    if let Some(email) = payload.email {
        user.email = email;
    }
    if let Some(telephone) = payload.telephone {
        user.telephone = telephone;
    }
    if let Some(login) = payload.login {
        user.login = login;
    }
    if let Some(residence) = payload.residence_administrative {
        user.residence_administrative = residence;
    }

    let updated = repo.update(&id, &user, payload.password.as_deref()).await?;
    Ok(Json(updated))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let result = repo(&state).delete(&id).await?;
    Ok(Json(result))
}
