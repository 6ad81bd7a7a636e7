//! Sport activity API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Activity, ActivityCreate, ActivityUpdate, ActivityWithType};
use crate::db::repository::{ACTIVITY_TYPES, ActivityRepository, TypeRegistryRepository};
use crate::utils::validation::{require_field, resolve_age};
use crate::utils::{AppError, AppResult};

fn repo(state: &ServerState) -> ActivityRepository {
    ActivityRepository::new(state.get_db())
}

fn registry(state: &ServerState) -> TypeRegistryRepository {
    TypeRegistryRepository::new(state.get_db(), ACTIVITY_TYPES)
}

/// GET /api/activities
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ActivityWithType>>> {
    let activities = repo(&state).find_all().await?;
    let resolver = registry(&state).load_resolver().await?;

    let labelled = activities
        .into_iter()
        .map(|activity| {
            let type_label =
                resolver.resolve(activity.type_id.as_ref(), activity.original_type_id.as_ref());
            ActivityWithType {
                activity,
                type_label,
            }
        })
        .collect();
    Ok(Json(labelled))
}

/// GET /api/activities/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActivityWithType>> {
    let activity = repo(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Activité {} non trouvée", id)))?;

    let resolver = registry(&state).load_resolver().await?;
    let type_label =
        resolver.resolve(activity.type_id.as_ref(), activity.original_type_id.as_ref());
    Ok(Json(ActivityWithType {
        activity,
        type_label,
    }))
}

/// POST /api/activities
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ActivityCreate>,
) -> AppResult<Json<Activity>> {
    let data = ActivityCreate {
        matricule: require_field(&payload.matricule, "matricule")?,
        nom: require_field(&payload.nom, "nom")?,
        prenom: require_field(&payload.prenom, "prenom")?,
        beneficiaire: require_field(&payload.beneficiaire, "beneficiaire")?,
        age: resolve_age(payload.beneficiaire.trim(), payload.age)?,
        type_id: payload.type_id,
    };

    let activity = repo(&state).create(data).await?;
    Ok(Json(activity))
}

/// PUT /api/activities/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ActivityUpdate>,
) -> AppResult<Json<Activity>> {
    let repo = repo(&state);
    let mut activity = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Activité {} non trouvée", id)))?;

    if let Some(matricule) = payload.matricule {
        activity.matricule = require_field(&matricule, "matricule")?;
    }
    if let Some(nom) = payload.nom {
        activity.nom = require_field(&nom, "nom")?;
    }
    if let Some(prenom) = payload.prenom {
        activity.prenom = require_field(&prenom, "prenom")?;
    }
    if let Some(beneficiaire) = payload.beneficiaire {
        activity.beneficiaire = require_field(&beneficiaire, "beneficiaire")?;
    }
    if let Some(age) = payload.age {
        activity.age = Some(age);
    }
    activity.age = resolve_age(&activity.beneficiaire, activity.age)?;

    if let Some(type_id) = payload.type_id {
        let resolved = repo.resolve_type_ref(Some(&type_id)).await?;
        activity.type_id = resolved.clone();
        activity.original_type_id = resolved;
    }

    let updated = repo.update(&id, &activity).await?;
    Ok(Json(updated))
}

/// DELETE /api/activities/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let result = repo(&state).delete(&id).await?;
    Ok(Json(result))
}
