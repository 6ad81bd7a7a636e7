//! Ticket-capacity accounting and duplicate detection for event
//! registrations.

use chrono::{NaiveDate, NaiveTime, Utc};
use club_server::db::DbService;
use club_server::db::models::{EVENT_STATUS_ACTIVE, EVENT_STATUS_EXPIRED, Event, Registration};
use club_server::db::repository::{EventRepository, RegistrationRepository, RepoError};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn memory_db() -> Surreal<Db> {
    DbService::memory().await.expect("in-memory db").db
}

async fn seed_event(db: &Surreal<Db>, capacity: i64, price: i64) -> Event {
    EventRepository::new(db.clone())
        .create(
            "Marathon".to_string(),
            NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            "Nabeul".to_string(),
            capacity,
            Decimal::new(price, 0),
            None,
        )
        .await
        .expect("create event")
}

fn registration(event: &Event, matricule: &str, beneficiaire: &str, tickets: i64) -> Registration {
    Registration {
        id: None,
        matricule: matricule.to_string(),
        nom: "Ben Salah".to_string(),
        prenom: "Amine".to_string(),
        age: if beneficiaire == "enfant" { Some(9) } else { None },
        beneficiaire: beneficiaire.to_string(),
        payment: "espèces".to_string(),
        eventname: event.event_name.clone(),
        event: event.id.clone().expect("event id"),
        user: None,
        number_of_tickets: tickets,
        total_amount: event.ticket_price * Decimal::from(tickets),
        date_inscription: Utc::now(),
        event_status: EVENT_STATUS_ACTIVE.to_string(),
    }
}

#[tokio::test]
async fn capacity_is_enforced_across_registrations() {
    let db = memory_db().await;
    let event = seed_event(&db, 10, 20).await;
    let repo = RegistrationRepository::new(db);
    let event_id = event.id.clone().expect("event id");

    // 6 of 10 tickets, amount 120
    let first = repo
        .create_admitted(&registration(&event, "A123", "enfant", 6), 10)
        .await
        .expect("first registration");
    assert_eq!(first.number_of_tickets, 6);
    assert_eq!(first.total_amount, Decimal::new(120, 0));
    assert_eq!(repo.tickets_used(&event_id, false).await.expect("sum"), 6);

    // 5 more would exceed the capacity of 10
    let err = repo
        .create_admitted(&registration(&event, "B456", "Agent TT", 5), 10)
        .await
        .expect_err("oversell must be rejected");
    assert!(matches!(err, RepoError::BusinessRule(_)), "got {err:?}");

    // 4 fit exactly
    repo.create_admitted(&registration(&event, "B456", "Agent TT", 4), 10)
        .await
        .expect("second registration");
    assert_eq!(repo.tickets_used(&event_id, false).await.expect("sum"), 10);
}

#[tokio::test]
async fn duplicate_triple_is_rejected() {
    let db = memory_db().await;
    let event = seed_event(&db, 100, 20).await;
    let repo = RegistrationRepository::new(db);

    repo.create_admitted(&registration(&event, "A123", "enfant", 1), 100)
        .await
        .expect("first registration");

    let err = repo
        .create_admitted(&registration(&event, "A123", "enfant", 1), 100)
        .await
        .expect_err("same (matricule, beneficiaire, event) must be rejected");
    assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");

    // Same matricule under the other beneficiary kind is a different triple
    repo.create_admitted(&registration(&event, "A123", "Agent TT", 1), 100)
        .await
        .expect("different beneficiary kind is allowed");
}

#[tokio::test]
async fn update_excludes_the_row_itself_from_checks() {
    let db = memory_db().await;
    let event = seed_event(&db, 10, 20).await;
    let repo = RegistrationRepository::new(db);

    let created = repo
        .create_admitted(&registration(&event, "A123", "enfant", 6), 10)
        .await
        .expect("registration");
    let id = created.id.clone().expect("id").to_string();

    // Bumping 6 -> 8 stays within capacity once the row itself is excluded
    let mut changed = created.clone();
    changed.number_of_tickets = 8;
    changed.total_amount = event.ticket_price * Decimal::from(8);
    let updated = repo
        .update_admitted(&id, &changed, 10)
        .await
        .expect("update within capacity");
    assert_eq!(updated.number_of_tickets, 8);

    // 11 does not fit any capacity math
    changed.number_of_tickets = 11;
    changed.total_amount = event.ticket_price * Decimal::from(11);
    let err = repo
        .update_admitted(&id, &changed, 10)
        .await
        .expect_err("over capacity");
    assert!(matches!(err, RepoError::BusinessRule(_)));
}

#[tokio::test]
async fn expired_registrations_leave_active_ticket_count() {
    let db = memory_db().await;
    let event = seed_event(&db, 50, 20).await;
    let repo = RegistrationRepository::new(db);
    let event_id = event.id.clone().expect("event id");

    repo.create_admitted(&registration(&event, "A123", "enfant", 3), 50)
        .await
        .expect("registration");

    repo.mark_expired_for_event(&event_id)
        .await
        .expect("mark expired");

    let rows = repo.find_by_event(&event_id).await.expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_status, EVENT_STATUS_EXPIRED);

    assert_eq!(repo.tickets_used(&event_id, true).await.expect("active"), 0);
    assert_eq!(repo.tickets_used(&event_id, false).await.expect("all"), 3);
}

#[tokio::test]
async fn deleting_a_registration_frees_capacity() {
    let db = memory_db().await;
    let event = seed_event(&db, 5, 20).await;
    let repo = RegistrationRepository::new(db);
    let event_id = event.id.clone().expect("event id");

    let created = repo
        .create_admitted(&registration(&event, "A123", "enfant", 5), 5)
        .await
        .expect("registration");

    let err = repo
        .create_admitted(&registration(&event, "B456", "enfant", 1), 5)
        .await
        .expect_err("full event");
    assert!(matches!(err, RepoError::BusinessRule(_)));

    repo.delete(&created.id.expect("id").to_string())
        .await
        .expect("delete");
    assert_eq!(repo.tickets_used(&event_id, false).await.expect("sum"), 0);

    repo.create_admitted(&registration(&event, "B456", "enfant", 1), 5)
        .await
        .expect("capacity freed");
}
