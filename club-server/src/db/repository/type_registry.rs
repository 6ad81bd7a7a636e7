//! Type registry repository.
//!
//! Club types and sport-activity types follow one lifecycle, applied to two
//! table families:
//!
//! - create: trimmed non-empty name, status starts at `"en cours"`
//! - delete: archive the name (once per type id), detach members by moving
//!   the live reference into `original_type_id`, mark the row `"expiré"`,
//!   then remove it
//! - display: live reference wins, then the archive, then "Non assigné"
//!
//! The member-detach step and the label resolution are the invariants the
//! rest of the system leans on: deleting a type never deletes members, and a
//! member's `original_type_id`, once set, is never cleared.

use std::collections::HashMap;

use chrono::Utc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{
    ArchivedType, STATUS_ACTIVE, STATUS_EXPIRED, TypeRecord, TypeRecordCreate, TypeRecordUpdate,
};

/// Table family a registry operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryTables {
    pub type_table: &'static str,
    pub archive_table: &'static str,
    pub member_table: &'static str,
}

/// Club types, archived into `archived_club_type`, referenced from `club`.
pub const CLUB_TYPES: RegistryTables = RegistryTables {
    type_table: "club_type",
    archive_table: "archived_club_type",
    member_table: "club",
};

/// Sport-activity types, referenced from `activity`.
pub const ACTIVITY_TYPES: RegistryTables = RegistryTables {
    type_table: "activity_type",
    archive_table: "archived_activity_type",
    member_table: "activity",
};

#[derive(Clone)]
pub struct TypeRegistryRepository {
    base: BaseRepository,
    tables: RegistryTables,
}

impl TypeRegistryRepository {
    pub fn new(db: Surreal<Db>, tables: RegistryTables) -> Self {
        Self {
            base: BaseRepository::new(db),
            tables,
        }
    }

    pub fn tables(&self) -> RegistryTables {
        self.tables
    }

    /// Find all types ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<TypeRecord>> {
        let sql = format!("SELECT * FROM {} ORDER BY name", self.tables.type_table);
        let types: Vec<TypeRecord> = self.base.db().query(sql).await?.take(0)?;
        Ok(types)
    }

    /// Find type by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<TypeRecord>> {
        let rid = parse_record_id(self.tables.type_table, id)?;
        let record: Option<TypeRecord> = self.base.db().select(rid).await?;
        Ok(record)
    }

    /// Create a new type with status "en cours"
    pub async fn create(&self, data: TypeRecordCreate) -> RepoResult<TypeRecord> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(RepoError::Validation(
                "Le nom du type ne peut pas être vide".to_string(),
            ));
        }

        let sql = format!(
            "CREATE {} SET name = $name, status = $status RETURN AFTER",
            self.tables.type_table
        );
        let created: Option<TypeRecord> = self
            .base
            .db()
            .query(sql)
            .bind(("name", name))
            .bind(("status", STATUS_ACTIVE))
            .await?
            .take(0)?;

        created.ok_or_else(|| RepoError::Database("Failed to create type".to_string()))
    }

    /// Update a type's name (and optionally override its status)
    pub async fn update(&self, id: &str, data: TypeRecordUpdate) -> RepoResult<TypeRecord> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(RepoError::Validation(
                "Le nom du type ne peut pas être vide".to_string(),
            ));
        }

        let rid = parse_record_id(self.tables.type_table, id)?;
        let status = data.status.map(|s| s.trim().to_string());

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET name = $name, status = $status OR status RETURN AFTER",
            )
            .bind(("thing", rid))
            .bind(("name", name))
            .bind(("status", status))
            .await?;

        result
            .take::<Option<TypeRecord>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Type {} not found", id)))
    }

    /// Archive-and-delete a type.
    ///
    /// Steps, in order:
    /// 1. archive the name, unless an archive row for this type id already
    ///    exists
    /// 2. detach members: `type_id -> NONE`, `original_type_id -> type id`
    /// 3. mark the row "expiré", then delete it
    pub async fn delete(&self, id: &str, deleted_by: Option<String>) -> RepoResult<()> {
        let rid = parse_record_id(self.tables.type_table, id)?;
        let record = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Type {} not found", id)))?;

        if self.find_archive_for(&rid).await?.is_none() {
            let sql = format!(
                "CREATE {} SET type_id = $type_id, name = $name, archived_at = $archived_at, deleted_by = $deleted_by",
                self.tables.archive_table
            );
            self.base
                .db()
                .query(sql)
                .bind(("type_id", rid.clone()))
                .bind(("name", record.name.clone()))
                .bind(("archived_at", Utc::now()))
                .bind(("deleted_by", deleted_by))
                .await?
                .check()?;
            tracing::info!(type_id = %rid, table = self.tables.type_table, "Type archived");
        } else {
            tracing::info!(type_id = %rid, "Type already archived, skipping archive step");
        }

        let detach = format!(
            "UPDATE {} SET type_id = NONE, original_type_id = $type_id WHERE type_id = $type_id",
            self.tables.member_table
        );
        self.base
            .db()
            .query(detach)
            .bind(("type_id", rid.clone()))
            .await?
            .check()?;

        self.base
            .db()
            .query("UPDATE $thing SET status = $status")
            .query("DELETE $thing")
            .bind(("thing", rid.clone()))
            .bind(("status", STATUS_EXPIRED))
            .await?
            .check()?;

        tracing::info!(type_id = %rid, table = self.tables.type_table, "Type deleted");
        Ok(())
    }

    /// Latest archive row for a given original type id, if any
    pub async fn find_archive_for(&self, type_id: &RecordId) -> RepoResult<Option<ArchivedType>> {
        let sql = format!(
            "SELECT * FROM {} WHERE type_id = $type_id ORDER BY archived_at DESC LIMIT 1",
            self.tables.archive_table
        );
        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("type_id", type_id.clone()))
            .await?;
        let rows: Vec<ArchivedType> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// All archive rows, newest first
    pub async fn find_all_archived(&self) -> RepoResult<Vec<ArchivedType>> {
        let sql = format!(
            "SELECT * FROM {} ORDER BY archived_at DESC",
            self.tables.archive_table
        );
        let rows: Vec<ArchivedType> = self.base.db().query(sql).await?.take(0)?;
        Ok(rows)
    }

    /// Snapshot live types and archives for label resolution.
    pub async fn load_resolver(&self) -> RepoResult<TypeResolver> {
        let live = self.find_all().await?;
        let archived = self.find_all_archived().await?;
        Ok(TypeResolver::new(live, archived))
    }
}

/// In-memory snapshot used to resolve membership labels.
///
/// The same resolution runs for list and single-item retrieval, so both
/// always agree on a member's label.
#[derive(Debug, Default)]
pub struct TypeResolver {
    live: HashMap<String, String>,
    archived: HashMap<String, String>,
}

impl TypeResolver {
    pub fn new(live: Vec<TypeRecord>, archived: Vec<ArchivedType>) -> Self {
        let live = live
            .into_iter()
            .filter_map(|t| t.id.as_ref().map(|id| (id.to_string(), t.name.clone())))
            .collect();

        // Rows arrive newest-first; keep the most recent name per type id.
        let mut archived_map = HashMap::new();
        for row in archived {
            archived_map
                .entry(row.type_id.to_string())
                .or_insert(row.name);
        }

        Self {
            live,
            archived: archived_map,
        }
    }

    /// Three-way resolution: live type, archived original, or unassigned.
    pub fn resolve(&self, type_id: Option<&RecordId>, original_type_id: Option<&RecordId>) -> String {
        if let Some(id) = type_id
            && let Some(name) = self.live.get(&id.to_string())
        {
            return format!("{} (En cours)", name);
        }
        if let Some(id) = original_type_id
            && let Some(name) = self.archived.get(&id.to_string())
        {
            return format!("{} (Expiré)", name);
        }
        "Non assigné".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(table: &str, key: &str) -> RecordId {
        RecordId::from_table_key(table, key)
    }

    fn resolver() -> TypeResolver {
        let live = vec![TypeRecord {
            id: Some(record("club_type", "foot")),
            name: "Football".into(),
            status: STATUS_ACTIVE.into(),
        }];
        let archived = vec![ArchivedType {
            id: Some(record("archived_club_type", "a1")),
            type_id: record("club_type", "tennis"),
            name: "Tennis".into(),
            archived_at: Utc::now(),
            deleted_by: Some("admin".into()),
        }];
        TypeResolver::new(live, archived)
    }

    #[test]
    fn live_type_resolves_en_cours() {
        let r = resolver();
        let live = record("club_type", "foot");
        assert_eq!(r.resolve(Some(&live), None), "Football (En cours)");
    }

    #[test]
    fn archived_original_resolves_expire() {
        let r = resolver();
        let orig = record("club_type", "tennis");
        assert_eq!(r.resolve(None, Some(&orig)), "Tennis (Expiré)");
    }

    #[test]
    fn live_reference_wins_over_archive() {
        let r = resolver();
        let live = record("club_type", "foot");
        let orig = record("club_type", "tennis");
        assert_eq!(r.resolve(Some(&live), Some(&orig)), "Football (En cours)");
    }

    #[test]
    fn unknown_references_resolve_unassigned() {
        let r = resolver();
        let ghost = record("club_type", "ghost");
        assert_eq!(r.resolve(None, None), "Non assigné");
        assert_eq!(r.resolve(Some(&ghost), None), "Non assigné");
        assert_eq!(r.resolve(None, Some(&ghost)), "Non assigné");
    }

    #[test]
    fn newest_archive_name_wins() {
        let orig = record("club_type", "tennis");
        let archived = vec![
            ArchivedType {
                id: None,
                type_id: orig.clone(),
                name: "Tennis 2024".into(),
                archived_at: Utc::now(),
                deleted_by: None,
            },
            ArchivedType {
                id: None,
                type_id: orig.clone(),
                name: "Tennis 2023".into(),
                archived_at: Utc::now(),
                deleted_by: None,
            },
        ];
        let r = TypeResolver::new(vec![], archived);
        assert_eq!(r.resolve(None, Some(&orig)), "Tennis 2024 (Expiré)");
    }
}
