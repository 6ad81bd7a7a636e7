//! Event registration repository.
//!
//! Admission control (capacity + duplicate detection) runs inside a single
//! database transaction together with the write, so two concurrent
//! registrations for the same event cannot both pass the capacity check and
//! oversell the event.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{EVENT_STATUS_ACTIVE, EVENT_STATUS_EXPIRED, Registration};

const TABLE: &str = "inscription";

/// Marker thrown inside the admission transaction when the requested tickets
/// would exceed the event capacity.
const ERR_CAPACITY: &str = "CAPACITY_EXCEEDED";

/// Marker thrown when a registration already exists for the same
/// (matricule, beneficiaire, event) triple.
const ERR_DUPLICATE: &str = "DUPLICATE_REGISTRATION";

const ADMIT_CREATE_SQL: &str = r#"
BEGIN TRANSACTION;
LET $used = math::sum((SELECT VALUE number_of_tickets FROM inscription WHERE event = $event AND id != $exclude));
IF $used + $tickets > $capacity { THROW "CAPACITY_EXCEEDED" };
LET $dup = (SELECT VALUE id FROM inscription WHERE event = $event AND matricule = $matricule AND beneficiaire = $beneficiaire AND id != $exclude);
IF array::len($dup) > 0 { THROW "DUPLICATE_REGISTRATION" };
CREATE type::thing('inscription', $key) SET
    matricule = $matricule,
    nom = $nom,
    prenom = $prenom,
    age = $age,
    beneficiaire = $beneficiaire,
    payment = $payment,
    eventname = $eventname,
    event = $event,
    user = $user,
    number_of_tickets = $tickets,
    total_amount = $total,
    date_inscription = $now,
    event_status = $event_status;
COMMIT TRANSACTION;
"#;

const ADMIT_UPDATE_SQL: &str = r#"
BEGIN TRANSACTION;
LET $used = math::sum((SELECT VALUE number_of_tickets FROM inscription WHERE event = $event AND id != $exclude));
IF $used + $tickets > $capacity { THROW "CAPACITY_EXCEEDED" };
LET $dup = (SELECT VALUE id FROM inscription WHERE event = $event AND matricule = $matricule AND beneficiaire = $beneficiaire AND id != $exclude);
IF array::len($dup) > 0 { THROW "DUPLICATE_REGISTRATION" };
UPDATE $exclude SET
    matricule = $matricule,
    nom = $nom,
    prenom = $prenom,
    age = $age,
    beneficiaire = $beneficiaire,
    payment = $payment,
    eventname = $eventname,
    event = $event,
    number_of_tickets = $tickets,
    total_amount = $total,
    event_status = $event_status;
COMMIT TRANSACTION;
"#;

#[derive(Clone)]
pub struct RegistrationRepository {
    base: BaseRepository,
}

impl RegistrationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all registrations, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Registration>> {
        let rows: Vec<Registration> = self
            .base
            .db()
            .query("SELECT * FROM inscription ORDER BY date_inscription DESC")
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Find registration by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Registration>> {
        let rid = parse_record_id(TABLE, id)?;
        let row: Option<Registration> = self.base.db().select(rid).await?;
        Ok(row)
    }

    /// All registrations recorded against an event
    pub async fn find_by_event(&self, event: &RecordId) -> RepoResult<Vec<Registration>> {
        let rows: Vec<Registration> = self
            .base
            .db()
            .query("SELECT * FROM inscription WHERE event = $event")
            .bind(("event", event.clone()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Sum of tickets sold for an event. With `only_active`, registrations
    /// already marked "Expiré" are excluded.
    pub async fn tickets_used(&self, event: &RecordId, only_active: bool) -> RepoResult<i64> {
        let sql = if only_active {
            "SELECT VALUE number_of_tickets FROM inscription WHERE event = $event AND event_status = $status"
        } else {
            "SELECT VALUE number_of_tickets FROM inscription WHERE event = $event"
        };
        let counts: Vec<i64> = self
            .base
            .db()
            .query(sql)
            .bind(("event", event.clone()))
            .bind(("status", EVENT_STATUS_ACTIVE))
            .await?
            .take(0)?;
        Ok(counts.into_iter().sum())
    }

    /// Whether a user already holds a registration for an event
    pub async fn exists_for_event_user(
        &self,
        event: &RecordId,
        user: &RecordId,
    ) -> RepoResult<bool> {
        let rows: Vec<Registration> = self
            .base
            .db()
            .query("SELECT * FROM inscription WHERE event = $event AND user = $user LIMIT 1")
            .bind(("event", event.clone()))
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(!rows.is_empty())
    }

    /// Admit and persist a new registration atomically against `capacity`.
    pub async fn create_admitted(
        &self,
        data: &Registration,
        capacity: i64,
    ) -> RepoResult<Registration> {
        let key = Uuid::new_v4().simple().to_string();
        // A create excludes nothing; bind a key that cannot exist.
        let exclude = RecordId::from_table_key(TABLE, "none");

        let result = self
            .base
            .db()
            .query(ADMIT_CREATE_SQL)
            .bind(("key", key.clone()))
            .bind(("exclude", exclude))
            .bind(("capacity", capacity))
            .bind(("tickets", data.number_of_tickets))
            .bind(("matricule", data.matricule.clone()))
            .bind(("nom", data.nom.clone()))
            .bind(("prenom", data.prenom.clone()))
            .bind(("age", data.age))
            .bind(("beneficiaire", data.beneficiaire.clone()))
            .bind(("payment", data.payment.clone()))
            .bind(("eventname", data.eventname.clone()))
            .bind(("event", data.event.clone()))
            .bind(("user", data.user.clone()))
            .bind(("total", data.total_amount))
            .bind(("now", data.date_inscription))
            .bind(("event_status", data.event_status.clone()))
            .await?;

        result.check().map_err(|e| map_admission_error(e, data))?;

        self.find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create registration".to_string()))
    }

    /// Re-admit an existing registration with new values, excluding the row
    /// itself from the duplicate and capacity checks.
    pub async fn update_admitted(
        &self,
        id: &str,
        data: &Registration,
        capacity: i64,
    ) -> RepoResult<Registration> {
        let rid = parse_record_id(TABLE, id)?;

        let result = self
            .base
            .db()
            .query(ADMIT_UPDATE_SQL)
            .bind(("exclude", rid.clone()))
            .bind(("capacity", capacity))
            .bind(("tickets", data.number_of_tickets))
            .bind(("matricule", data.matricule.clone()))
            .bind(("nom", data.nom.clone()))
            .bind(("prenom", data.prenom.clone()))
            .bind(("age", data.age))
            .bind(("beneficiaire", data.beneficiaire.clone()))
            .bind(("payment", data.payment.clone()))
            .bind(("eventname", data.eventname.clone()))
            .bind(("event", data.event.clone()))
            .bind(("total", data.total_amount))
            .bind(("event_status", data.event_status.clone()))
            .await?;

        result.check().map_err(|e| map_admission_error(e, data))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Inscription {} not found", id)))
    }

    /// Hard delete a registration
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(TABLE, id)?;
        let existing: Option<Registration> = self.base.db().select(rid.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!("Inscription {} not found", id)));
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", rid))
            .await?
            .check()?;
        Ok(true)
    }

    /// Flip every registration of an event to "Expiré" (event removal).
    pub async fn mark_expired_for_event(&self, event: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE inscription SET event_status = $status WHERE event = $event")
            .bind(("status", EVENT_STATUS_EXPIRED))
            .bind(("event", event.clone()))
            .await?
            .check()?;
        Ok(())
    }
}

fn map_admission_error(e: surrealdb::Error, data: &Registration) -> RepoError {
    let text = e.to_string();
    if text.contains(ERR_CAPACITY) {
        RepoError::BusinessRule(format!(
            "L'événement {} n'a plus assez de tickets disponibles",
            data.eventname
        ))
    } else if text.contains(ERR_DUPLICATE) {
        RepoError::Duplicate(format!(
            "Une inscription existe déjà pour cet événement en tant que \"{}\"",
            data.beneficiaire
        ))
    } else {
        RepoError::Database(text)
    }
}
