//! Event registration API Handlers
//!
//! Creation is open to any authenticated caller; listing, updating and
//! deleting are admin-only. The capacity and duplicate checks run
//! atomically with the write inside the repository.

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use surrealdb::RecordId;

use crate::auth::{ADMIN_SUBJECT, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{EVENT_STATUS_ACTIVE, Event, Registration, RegistrationCreate, RegistrationUpdate};
use crate::db::repository::{EventRepository, RegistrationRepository, UserRepository, parse_record_id};
use crate::utils::validation::{require_field, resolve_age};
use crate::utils::{AppError, AppResult};

fn repo(state: &ServerState) -> RegistrationRepository {
    RegistrationRepository::new(state.get_db())
}

fn require_admin_caller(user: &CurrentUser, action: &str) -> Result<(), AppError> {
    if !user.is_admin() {
        return Err(AppError::forbidden(format!(
            "Seul un administrateur peut {} une inscription",
            action
        )));
    }
    Ok(())
}

async fn load_event(state: &ServerState, event_id: &str) -> Result<Event, AppError> {
    EventRepository::new(state.get_db())
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Événement {} non trouvé", event_id)))
}

fn check_event_name(supplied: &str, event: &Event) -> Result<(), AppError> {
    if supplied != event.event_name {
        return Err(AppError::validation(format!(
            "Le nom de l'événement ({}) ne correspond pas à l'ID fourni",
            supplied
        )));
    }
    Ok(())
}

fn check_total_amount(
    total: Decimal,
    tickets: i64,
    price: Decimal,
) -> Result<(), AppError> {
    let expected = price * Decimal::from(tickets);
    if total != expected {
        return Err(AppError::validation(format!(
            "Le montant total ({} TND) ne correspond pas au calcul attendu ({} TND)",
            total, expected
        )));
    }
    Ok(())
}

/// Resolve the caller to a stored user reference. Bootstrap admin tokens
/// carry no user row and resolve to `None`.
async fn resolve_caller(
    state: &ServerState,
    current_user: &CurrentUser,
) -> Result<Option<RecordId>, AppError> {
    if current_user.id == ADMIN_SUBJECT {
        return Ok(None);
    }
    let user = UserRepository::new(state.get_db())
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Utilisateur {} non trouvé", current_user.id))
        })?;
    Ok(user.id)
}

/// GET /api/registrations - admin only
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Registration>>> {
    require_admin_caller(&current_user, "consulter")?;
    let rows = repo(&state).find_all().await?;
    Ok(Json(rows))
}

/// GET /api/registrations/{id} - admin only
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Registration>> {
    require_admin_caller(&current_user, "consulter")?;
    let row = repo(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Inscription {} non trouvée", id)))?;
    Ok(Json(row))
}

/// POST /api/registrations
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<RegistrationCreate>,
) -> AppResult<Json<Registration>> {
    let matricule = require_field(&payload.matricule, "matricule")?;
    let nom = require_field(&payload.nom, "nom")?;
    let prenom = require_field(&payload.prenom, "prenom")?;
    let beneficiaire = require_field(&payload.beneficiaire, "beneficiaire")?;
    let payment = require_field(&payload.payment, "payment")?;
    let eventname = require_field(&payload.eventname, "eventname")?;
    let age = resolve_age(&beneficiaire, payload.age)?;

    if payload.number_of_tickets <= 0 {
        return Err(AppError::validation(
            "Le nombre de tickets doit être supérieur à zéro",
        ));
    }

    let event = load_event(&state, &payload.event_id).await?;
    check_event_name(&eventname, &event)?;
    check_total_amount(
        payload.total_amount,
        payload.number_of_tickets,
        event.ticket_price,
    )?;

    let user = resolve_caller(&state, &current_user).await?;
    let event_ref = event
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Event record has no id"))?;

    let registration = Registration {
        id: None,
        matricule,
        nom,
        prenom,
        age,
        beneficiaire,
        payment,
        eventname,
        event: event_ref,
        user,
        number_of_tickets: payload.number_of_tickets,
        total_amount: payload.total_amount,
        date_inscription: Utc::now(),
        event_status: EVENT_STATUS_ACTIVE.to_string(),
    };

    let created = repo(&state)
        .create_admitted(&registration, event.ticket_number)
        .await?;
    Ok(Json(created))
}

/// PUT /api/registrations/{id} - admin only; validations re-applied against
/// the merged values, excluding this row from duplicate/capacity checks
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<RegistrationUpdate>,
) -> AppResult<Json<Registration>> {
    require_admin_caller(&current_user, "modifier")?;

    let repo = repo(&state);
    let mut registration = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Inscription {} non trouvée", id)))?;

    if let Some(matricule) = payload.matricule {
        registration.matricule = require_field(&matricule, "matricule")?;
    }
    if let Some(nom) = payload.nom {
        registration.nom = require_field(&nom, "nom")?;
    }
    if let Some(prenom) = payload.prenom {
        registration.prenom = require_field(&prenom, "prenom")?;
    }
    if let Some(beneficiaire) = payload.beneficiaire {
        registration.beneficiaire = require_field(&beneficiaire, "beneficiaire")?;
    }
    if let Some(payment) = payload.payment {
        registration.payment = require_field(&payment, "payment")?;
    }
    if let Some(age) = payload.age {
        registration.age = Some(age);
    }
    registration.age = resolve_age(&registration.beneficiaire, registration.age)?;

    if let Some(eventname) = payload.eventname {
        registration.eventname = require_field(&eventname, "eventname")?;
    }
    if let Some(event_id) = payload.event_id {
        registration.event = parse_record_id("event", &event_id)?;
    }
    if let Some(tickets) = payload.number_of_tickets {
        if tickets <= 0 {
            return Err(AppError::validation(
                "Le nombre de tickets doit être supérieur à zéro",
            ));
        }
        registration.number_of_tickets = tickets;
    }
    if let Some(total) = payload.total_amount {
        registration.total_amount = total;
    }

    // Event lookup + name and amount checks against the merged values
    let event = load_event(&state, &registration.event.to_string()).await?;
    check_event_name(&registration.eventname, &event)?;
    check_total_amount(
        registration.total_amount,
        registration.number_of_tickets,
        event.ticket_price,
    )?;

    let updated = repo
        .update_admitted(&id, &registration, event.ticket_number)
        .await?;
    Ok(Json(updated))
}

/// DELETE /api/registrations/{id} - admin only
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    require_admin_caller(&current_user, "supprimer")?;
    let result = repo(&state).delete(&id).await?;
    Ok(Json(result))
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub is_inscribed: bool,
}

/// GET /api/registrations/check/{event_id}/{user_id}
pub async fn check(
    State(state): State<ServerState>,
    Path((event_id, user_id)): Path<(String, String)>,
) -> AppResult<Json<CheckResponse>> {
    let event = parse_record_id("event", &event_id)?;
    let user = parse_record_id("user", &user_id)?;
    let is_inscribed = repo(&state).exists_for_event_user(&event, &user).await?;
    Ok(Json(CheckResponse { is_inscribed }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn event(price: i64) -> Event {
        Event {
            id: None,
            event_name: "Marathon".to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            event_location: "Nabeul".to_string(),
            ticket_number: 10,
            ticket_price: Decimal::new(price, 0),
            event_image: None,
        }
    }

    #[test]
    fn total_amount_must_match_tickets_times_price() {
        // 6 tickets at 20 TND = 120
        assert!(check_total_amount(Decimal::new(120, 0), 6, Decimal::new(20, 0)).is_ok());
        assert!(check_total_amount(Decimal::new(100, 0), 6, Decimal::new(20, 0)).is_err());
        assert!(check_total_amount(Decimal::new(121, 0), 6, Decimal::new(20, 0)).is_err());
    }

    #[test]
    fn supplied_event_name_must_match_the_stored_one() {
        let event = event(20);
        assert!(check_event_name("Marathon", &event).is_ok());
        assert!(check_event_name("Tournoi", &event).is_err());
    }
}
