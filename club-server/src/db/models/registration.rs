//! Event registration (inscription) model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Registration status while the event is upcoming.
pub const EVENT_STATUS_ACTIVE: &str = "En cours";

/// Registration status once the event has been removed or has passed.
pub const EVENT_STATUS_EXPIRED: &str = "Expiré";

/// A ticket purchase for one event by one participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub matricule: String,
    pub nom: String,
    pub prenom: String,
    #[serde(default)]
    pub age: Option<i64>,
    pub beneficiaire: String,
    pub payment: String,
    pub eventname: String,
    #[serde(with = "serde_helpers::record_id")]
    pub event: RecordId,
    /// Absent for registrations recorded by the bootstrap admin account.
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub user: Option<RecordId>,
    pub number_of_tickets: i64,
    pub total_amount: Decimal,
    pub date_inscription: DateTime<Utc>,
    #[serde(default = "default_event_status")]
    pub event_status: String,
}

fn default_event_status() -> String {
    EVENT_STATUS_ACTIVE.to_string()
}

/// Create payload
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationCreate {
    pub matricule: String,
    pub nom: String,
    pub prenom: String,
    pub age: Option<i64>,
    pub beneficiaire: String,
    pub payment: String,
    pub eventname: String,
    pub event_id: String,
    pub number_of_tickets: i64,
    pub total_amount: Decimal,
}

/// Update payload (admin only); all fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationUpdate {
    pub matricule: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub age: Option<i64>,
    pub beneficiaire: Option<String>,
    pub payment: Option<String>,
    pub eventname: Option<String>,
    pub event_id: Option<String>,
    pub number_of_tickets: Option<i64>,
    pub total_amount: Option<Decimal>,
}
