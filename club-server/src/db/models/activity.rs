//! Sport activity membership model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// A participant enrolled in a sport activity. Same lifecycle contract as
/// [`super::Club`]: `type_id` is the live reference, `original_type_id`
/// survives the type's deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
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
pub struct ActivityCreate {
    pub matricule: String,
    pub nom: String,
    pub prenom: String,
    pub age: Option<i64>,
    pub beneficiaire: String,
    pub type_id: Option<String>,
}

/// Update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityUpdate {
    pub matricule: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub age: Option<i64>,
    pub beneficiaire: Option<String>,
    pub type_id: Option<String>,
}

/// Activity plus its resolved type label.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityWithType {
    #[serde(flatten)]
    pub activity: Activity,
    pub type_label: String,
}
