//! Club type API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Club, TypeRecord, TypeRecordCreate, TypeRecordUpdate};
use crate::db::repository::{CLUB_TYPES, ClubRepository, TypeRegistryRepository, parse_record_id};
use crate::utils::{AppError, AppResult};

fn registry(state: &ServerState) -> TypeRegistryRepository {
    TypeRegistryRepository::new(state.get_db(), CLUB_TYPES)
}

/// GET /api/club-types
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TypeRecord>>> {
    let types = registry(&state).find_all().await?;
    Ok(Json(types))
}

/// GET /api/club-types/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<TypeRecord>> {
    let record = registry(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Type de club {} non trouvé", id)))?;
    Ok(Json(record))
}

/// POST /api/club-types
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

/// PUT /api/club-types/{id}
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

/// DELETE /api/club-types/{id}
///
/// Archives the type, detaches its members and removes the row.
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

/// GET /api/club-types/{id}/members
pub async fn list_members(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Club>>> {
    let rid = parse_record_id(CLUB_TYPES.type_table, &id)?;
    let members = ClubRepository::new(state.get_db())
        .find_by_type(&rid)
        .await?;
    Ok(Json(members))
}
