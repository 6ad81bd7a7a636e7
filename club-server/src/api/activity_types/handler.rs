//! Sport-activity type API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Activity, TypeRecord, TypeRecordCreate, TypeRecordUpdate};
use crate::db::repository::{
    ACTIVITY_TYPES, ActivityRepository, TypeRegistryRepository, parse_record_id,
};
use crate::utils::{AppError, AppResult};

fn registry(state: &ServerState) -> TypeRegistryRepository {
    TypeRegistryRepository::new(state.get_db(), ACTIVITY_TYPES)
}

/// GET /api/activity-types
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TypeRecord>>> {
    let types = registry(&state).find_all().await?;
    Ok(Json(types))
}

/// GET /api/activity-types/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TypeRecord>> {
    let record = registry(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Type d'activité {} non trouvé", id)))?;
    Ok(Json(record))
}

/// POST /api/activity-types
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TypeRecordCreate>,
) -> AppResult<Json<TypeRecord>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let record = registry(&state).create(payload).await?;
    Ok(Json(record))
}

/// PUT /api/activity-types/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TypeRecordUpdate>,
) -> AppResult<Json<TypeRecord>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let record = registry(&state).update(&id, payload).await?;
    Ok(Json(record))
}

/// DELETE /api/activity-types/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    registry(&state)
        .delete(&id, Some(current_user.username.clone()))
        .await?;
    Ok(Json(true))
}

/// GET /api/activity-types/{id}/members
pub async fn list_members(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Activity>>> {
    let rid = parse_record_id(ACTIVITY_TYPES.type_table, &id)?;
    let members = ActivityRepository::new(state.get_db())
        .find_by_type(&rid)
        .await?;
    Ok(Json(members))
}
