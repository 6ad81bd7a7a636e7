//! Event API Handlers
//!
//! Create and update accept multipart form data: the textual event fields
//! plus an `event_image` file part. Publishing an event emails every user a
//! notification; the fan-out runs off the request path.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::db::models::{Event, EventFields, EventWithAvailability};
use crate::db::repository::{EventRepository, RegistrationRepository, UserRepository};
use crate::utils::{AppError, AppResult};

fn repo(state: &ServerState) -> EventRepository {
    EventRepository::new(state.get_db())
}

/// Parsed multipart body: textual fields plus the optional image part.
struct EventForm {
    fields: EventFields,
    image: Option<(Vec<u8>, String)>,
}

async fn read_event_form(mut multipart: Multipart) -> Result<EventForm, AppError> {
    let mut fields = EventFields::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();
        match name.as_str() {
            "event_image" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| AppError::validation("No filename provided for event_image"))?;
                let data = field.bytes().await?.to_vec();
                image = Some((data, filename));
            }
            "event_name" => fields.event_name = Some(field.text().await?),
            "event_date" => {
                let raw = field.text().await?;
                let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                    AppError::validation(format!("Invalid event_date '{}', expected YYYY-MM-DD", raw))
                })?;
                fields.event_date = Some(date);
            }
            "start_time" => {
                let raw = field.text().await?;
                let trimmed = raw.trim();
                let time = NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
                    .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
                    .map_err(|_| {
                        AppError::validation(format!("Invalid start_time '{}', expected HH:MM", raw))
                    })?;
                fields.start_time = Some(time);
            }
            "event_location" => fields.event_location = Some(field.text().await?),
            "ticket_number" => {
                let raw = field.text().await?;
                let number: i64 = raw.trim().parse().map_err(|_| {
                    AppError::validation(format!("Invalid ticket_number '{}'", raw))
                })?;
                if number <= 0 {
                    return Err(AppError::validation("ticket_number must be positive"));
                }
                fields.ticket_number = Some(number);
            }
            "ticket_price" => {
                let raw = field.text().await?;
                let price: Decimal = raw.trim().parse().map_err(|_| {
                    AppError::validation(format!("Invalid ticket_price '{}'", raw))
                })?;
                fields.ticket_price = Some(price);
            }
            _ => {}
        }
    }

    Ok(EventForm { fields, image })
}

/// GET /api/events - each event annotated with ticket accounting over its
/// active registrations
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<EventWithAvailability>>> {
    let events = repo(&state).find_all().await?;
    let registrations = RegistrationRepository::new(state.get_db());

    let mut annotated = Vec::with_capacity(events.len());
    for event in events {
        let used = match &event.id {
            Some(id) => registrations.tickets_used(id, true).await?,
            None => 0,
        };
        let tickets_available = event.ticket_number - used;
        annotated.push(EventWithAvailability {
            event,
            inscription_count: used,
            tickets_available,
        });
    }
    Ok(Json(annotated))
}

/// GET /api/events/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<EventWithAvailability>> {
    let event = repo(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Événement {} non trouvé", id)))?;

    let registrations = RegistrationRepository::new(state.get_db());
    let used = match &event.id {
        Some(id) => registrations.tickets_used(id, true).await?,
        None => 0,
    };
    let tickets_available = event.ticket_number - used;
    Ok(Json(EventWithAvailability {
        event,
        inscription_count: used,
        tickets_available,
    }))
}

/// POST /api/events - multipart create with mandatory image
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<Json<Event>> {
    let form = read_event_form(multipart).await?;

    let (image_data, image_name) = form
        .image
        .ok_or_else(|| AppError::validation("Aucun fichier image téléchargé"))?;
    let f = form.fields;
    let event_name = f
        .event_name
        .ok_or_else(|| AppError::validation("event_name is required"))?;
    let event_date = f
        .event_date
        .ok_or_else(|| AppError::validation("event_date is required"))?;
    let start_time = f
        .start_time
        .ok_or_else(|| AppError::validation("start_time is required"))?;
    let event_location = f
        .event_location
        .ok_or_else(|| AppError::validation("event_location is required"))?;
    let ticket_number = f
        .ticket_number
        .ok_or_else(|| AppError::validation("ticket_number is required"))?;
    let ticket_price = f
        .ticket_price
        .ok_or_else(|| AppError::validation("ticket_price is required"))?;

    let stored_image = state.images.save(&image_data, &image_name)?;

    let event = repo(&state)
        .create(
            event_name,
            event_date,
            start_time,
            event_location,
            ticket_number,
            ticket_price,
            Some(stored_image),
        )
        .await?;

    notify_users(&state, event.clone());

    Ok(Json(event))
}

/// PUT /api/events/{id} - multipart update, image part optional
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Event>> {
    let repo = repo(&state);
    let mut event = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Événement {} non trouvé", id)))?;

    let form = read_event_form(multipart).await?;
    let f = form.fields;

    if let Some(event_name) = f.event_name {
        event.event_name = event_name;
    }
    if let Some(event_date) = f.event_date {
        event.event_date = event_date;
    }
    if let Some(start_time) = f.start_time {
        event.start_time = start_time;
    }
    if let Some(event_location) = f.event_location {
        event.event_location = event_location;
    }
    if let Some(ticket_number) = f.ticket_number {
        event.ticket_number = ticket_number;
    }
    if let Some(ticket_price) = f.ticket_price {
        event.ticket_price = ticket_price;
    }

    if let Some((image_data, image_name)) = form.image {
        let stored = state.images.save(&image_data, &image_name)?;
        if let Some(previous) = event.event_image.replace(stored)
            && Some(&previous) != event.event_image.as_ref()
        {
            state.images.remove(&previous);
        }
    }

    let updated = repo.update(&id, &event).await?;
    Ok(Json(updated))
}

/// DELETE /api/events/{id}
///
/// Marks the event's registrations "Expiré", removes the stored image and
/// deletes the row.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = repo(&state);
    let event = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Événement {} non trouvé", id)))?;

    if let Some(event_id) = &event.id {
        RegistrationRepository::new(state.get_db())
            .mark_expired_for_event(event_id)
            .await?;
    }

    if let Some(image) = &event.event_image {
        state.images.remove(image);
    }

    let result = repo.delete(&id).await?;
    tracing::info!(event = %event.event_name, "Event deleted");
    Ok(Json(result))
}

/// GET /api/events/check-expired - run the expiration sweep on demand
pub async fn check_expired(State(state): State<ServerState>) -> AppResult<Json<Value>> {
    let sent = state.expiration.check_expired_events().await?;
    Ok(Json(json!({
        "message": "Vérification des événements terminés effectuée",
        "notifications_sent": sent,
    })))
}

/// Fan out the new-event notification to every user, off the request path.
fn notify_users(state: &ServerState, event: Event) {
    let db = state.get_db();
    let mailer = state.mailer.clone();
    let frontend_url = state.config.frontend_url.clone();

    tokio::spawn(async move {
        let users = match UserRepository::new(db).find_all().await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load users for event notification");
                return;
            }
        };

        let event_link = match &event.id {
            Some(id) => format!("{}/evenements/{}", frontend_url, id),
            None => frontend_url.clone(),
        };

        let sends = users.iter().map(|user| {
            let mailer = &mailer;
            let event = &event;
            let event_link = &event_link;
            async move {
                if let Err(e) = mailer
                    .send_event_notification(&user.email, &user.nom, event, event_link)
                    .await
                {
                    tracing::error!(to = %user.email, error = %e, "Event notification failed");
                }
            }
        });
        futures::future::join_all(sends).await;

        tracing::info!(event = %event.event_name, "Event notifications dispatched");
    });
}
