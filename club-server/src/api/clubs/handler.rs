//! Club membership API Handlers
//!
//! List and single-item responses carry the resolved type label computed by
//! the registry resolver, so both always agree.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Club, ClubCreate, ClubUpdate, ClubWithType};
use crate::db::repository::{CLUB_TYPES, ClubRepository, TypeRegistryRepository};
use crate::utils::validation::{require_field, resolve_age};
use crate::utils::{AppError, AppResult};

fn repo(state: &ServerState) -> ClubRepository {
    ClubRepository::new(state.get_db())
}

fn registry(state: &ServerState) -> TypeRegistryRepository {
    TypeRegistryRepository::new(state.get_db(), CLUB_TYPES)
}

/// GET /api/clubs
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ClubWithType>>> {
    let clubs = repo(&state).find_all().await?;
    let resolver = registry(&state).load_resolver().await?;

    let labelled = clubs
        .into_iter()
        .map(|club| {
            let type_label = resolver.resolve(club.type_id.as_ref(), club.original_type_id.as_ref());
            ClubWithType { club, type_label }
        })
        .collect();
    Ok(Json(labelled))
}

/// GET /api/clubs/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ClubWithType>> {
    let club = repo(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Club {} non trouvé", id)))?;

    let resolver = registry(&state).load_resolver().await?;
    let type_label = resolver.resolve(club.type_id.as_ref(), club.original_type_id.as_ref());
    Ok(Json(ClubWithType { club, type_label }))
}

/// POST /api/clubs
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClubCreate>,
) -> AppResult<Json<Club>> {
    let data = ClubCreate {
        matricule: require_field(&payload.matricule, "matricule")?,
        nom: require_field(&payload.nom, "nom")?,
        prenom: require_field(&payload.prenom, "prenom")?,
        beneficiaire: require_field(&payload.beneficiaire, "beneficiaire")?,
        age: resolve_age(payload.beneficiaire.trim(), payload.age)?,
        type_id: payload.type_id,
    };

    let club = repo(&state).create(data).await?;
    Ok(Json(club))
}

/// PUT /api/clubs/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ClubUpdate>,
) -> AppResult<Json<Club>> {
    let repo = repo(&state);
    let mut club = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Club {} non trouvé", id)))?;

    if let Some(matricule) = payload.matricule {
        club.matricule = require_field(&matricule, "matricule")?;
    }
    if let Some(nom) = payload.nom {
        club.nom = require_field(&nom, "nom")?;
    }
    if let Some(prenom) = payload.prenom {
        club.prenom = require_field(&prenom, "prenom")?;
    }
    if let Some(beneficiaire) = payload.beneficiaire {
        club.beneficiaire = require_field(&beneficiaire, "beneficiaire")?;
    }
    if let Some(age) = payload.age {
        club.age = Some(age);
    }
    // Conditional age rule re-applied against the merged record
    club.age = resolve_age(&club.beneficiaire, club.age)?;

    // Reassigning a type also moves the retained original reference
    if let Some(type_id) = payload.type_id {
        let resolved = repo.resolve_type_ref(Some(&type_id)).await?;
        club.type_id = resolved.clone();
        club.original_type_id = resolved;
    }

    let updated = repo.update(&id, &club).await?;
    Ok(Json(updated))
}

/// DELETE /api/clubs/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let result = repo(&state).delete(&id).await?;
    Ok(Json(result))
}
