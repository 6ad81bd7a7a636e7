//! Review API Handlers
//!
//! A review is scored by the external sentiment analyzer before it is
//! stored; one review per (event, user).

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Review, ReviewCreate};
use crate::db::repository::{
    EventRepository, ReviewRepository, UserRepository, parse_record_id,
};
use crate::utils::{AppError, AppResult};

fn repo(state: &ServerState) -> ReviewRepository {
    ReviewRepository::new(state.get_db())
}

/// GET /api/reviews - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Review>>> {
    let rows = repo(&state).find_all().await?;
    Ok(Json(rows))
}

/// GET /api/reviews/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Review>> {
    let review = repo(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Avis {} non trouvé", id)))?;
    Ok(Json(review))
}

/// GET /api/reviews/event/{event_id}
pub async fn list_by_event(
    State(state): State<ServerState>,
    Path(event_id): Path<String>,
) -> AppResult<Json<Vec<Review>>> {
    let event = parse_record_id("event", &event_id)?;
    let rows = repo(&state).find_by_event(&event).await?;
    Ok(Json(rows))
}

/// POST /api/reviews
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<Review>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if payload.comment.trim().is_empty() {
        return Err(AppError::validation("Le commentaire ne peut pas être vide"));
    }

    // Callers can only review as themselves
    let user_ref = parse_record_id("user", &payload.user_id)?;
    let caller_ref = parse_record_id("user", &current_user.id)
        .map_err(|_| AppError::forbidden("Utilisateur non autorisé"))?;
    if user_ref != caller_ref {
        return Err(AppError::forbidden("Utilisateur non autorisé"));
    }

    let event = EventRepository::new(state.get_db())
        .find_by_id(&payload.event_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Événement {} non trouvé", payload.event_id))
        })?;
    let event_ref = event
        .id
        .ok_or_else(|| AppError::internal("Event record has no id"))?;

    let user = UserRepository::new(state.get_db())
        .find_by_id(&payload.user_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Utilisateur {} non trouvé", payload.user_id))
        })?;

    let sentiment = state.sentiment.analyze(payload.comment.trim()).await?;

    let review = repo(&state)
        .create(
            event_ref,
            user_ref,
            payload.matricule.clone(),
            Some(user.nom.clone()),
            Some(user.prenom.clone()),
            payload.rating,
            payload.comment.trim().to_string(),
            sentiment,
        )
        .await?;

    Ok(Json(review))
}

/// DELETE /api/reviews/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let result = repo(&state).delete(&id).await?;
    Ok(Json(result))
}
