//! Club membership model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// A participant enrolled in a club.
///
/// `type_id` points at the live club type and is cleared when that type is
/// archived; `original_type_id` is set when a type is first assigned and is
/// never cleared afterwards, so the archived name stays resolvable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub matricule: String,
    pub nom: String,
    pub prenom: String,
    #[serde(default)]
    pub age: Option<i64>,
    pub beneficiaire: String,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub type_id: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub original_type_id: Option<RecordId>,
    pub date_inscription: DateTime<Utc>,
}

/// Create payload
#[derive(Debug, Clone, Deserialize)]
pub struct ClubCreate {
    pub matricule: String,
    pub nom: String,
    pub prenom: String,
    pub age: Option<i64>,
    pub beneficiaire: String,
    pub type_id: Option<String>,
}

/// Update payload. A present `type_id` reassigns the live type; an absent
/// one leaves the assignment untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClubUpdate {
    pub matricule: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub age: Option<i64>,
    pub beneficiaire: Option<String>,
    pub type_id: Option<String>,
}

/// Club plus its resolved type label ("Football (En cours)", "Football
/// (Expiré)" or "Non assigné").
#[derive(Debug, Clone, Serialize)]
pub struct ClubWithType {
    #[serde(flatten)]
    pub club: Club,
    pub type_label: String,
}
