//! Repository Module
//!
//! CRUD operations over the embedded SurrealDB store. Record links are kept
//! native in the database; ids cross the API boundary as "table:id" strings.

// Type registries (shared lifecycle for club and activity types)
pub mod type_registry;

// Memberships
pub mod activity;
pub mod club;

// Events
pub mod event;
pub mod registration;

// Reviews
pub mod review;

// Users
pub mod user;

// Dashboard rollups
pub mod stats;

// Re-exports
pub use activity::ActivityRepository;
pub use club::ClubRepository;
pub use event::EventRepository;
pub use registration::RegistrationRepository;
pub use review::ReviewRepository;
pub use stats::StatsRepository;
pub use type_registry::{
    ACTIVITY_TYPES, CLUB_TYPES, RegistryTables, TypeRegistryRepository, TypeResolver,
};
pub use user::UserRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse an id coming from a path or payload into a record id for `table`.
///
/// Accepts both the bare key (`"abc123"`) and the full form
/// (`"club_type:abc123"`); rejects ids that name a different table.
pub fn parse_record_id(table: &str, id: &str) -> Result<RecordId, RepoError> {
    if let Some((tb, key)) = id.split_once(':') {
        if tb != table {
            return Err(RepoError::Validation(format!(
                "Invalid id '{}' for table '{}'",
                id, table
            )));
        }
        Ok(RecordId::from_table_key(tb, key))
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_bare_and_prefixed_keys() {
        let a = parse_record_id("club_type", "abc").unwrap();
        let b = parse_record_id("club_type", "club_type:abc").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_rejects_foreign_table_prefix() {
        assert!(parse_record_id("club_type", "event:abc").is_err());
    }
}
