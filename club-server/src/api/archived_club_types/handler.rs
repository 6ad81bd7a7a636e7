//! Archived club type API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::ArchivedType;
use crate::db::repository::{CLUB_TYPES, TypeRegistryRepository, parse_record_id};
use crate::utils::{AppError, AppResult};

fn registry(state: &ServerState) -> TypeRegistryRepository {
    TypeRegistryRepository::new(state.get_db(), CLUB_TYPES)
}

/// GET /api/archived-club-types - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ArchivedType>>> {
    let rows = registry(&state).find_all_archived().await?;
    Ok(Json(rows))
}

/// GET /api/archived-club-types/by-type/{type_id} - latest archive row for
/// an original type id
pub async fn get_by_type(
    State(state): State<ServerState>,
    Path(type_id): Path<String>,
) -> AppResult<Json<ArchivedType>> {
    let rid = parse_record_id(CLUB_TYPES.type_table, &type_id)?;
    let row = registry(&state)
        .find_archive_for(&rid)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Aucune archive pour le type {}", type_id))
        })?;
    Ok(Json(row))
}
