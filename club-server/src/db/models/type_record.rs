//! Type registry models.
//!
//! Club types and sport-activity types share the same shape and lifecycle;
//! the table they live in is decided by the repository (see
//! `repository::type_registry`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

/// Lifecycle status of a live type.
pub const STATUS_ACTIVE: &str = "en cours";

/// Status written just before the row is removed.
pub const STATUS_EXPIRED: &str = "expiré";

/// A live category that memberships can reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    STATUS_ACTIVE.to_string()
}

/// Create payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TypeRecordCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

/// Update payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TypeRecordUpdate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub status: Option<String>,
}

/// Append-only archive row written when a type is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedType {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub type_id: RecordId,
    pub name: String,
    pub archived_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,
}
