//! Review model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::Sentiment;
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

/// A rating + comment left by one user for one event, enriched with the
/// sentiment computed by the external analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub event: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub user: Option<RecordId>,
    pub matricule: String,
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub prenom: Option<String>,
    pub rating: i64,
    pub comment: String,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    pub created_at: DateTime<Utc>,
}

/// Create payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewCreate {
    pub event_id: String,
    pub user_id: String,
    pub matricule: String,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i64,
    #[validate(length(min = 1, message = "comment must not be empty"))]
    pub comment: String,
}
