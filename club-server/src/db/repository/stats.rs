//! Dashboard rollup queries.
//!
//! Grouped counts over the membership, registration and review tables. Name
//! resolution (live vs. archived types, event names) happens in the
//! dashboard service on top of these raw rows.

use serde::Deserialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoResult};
use crate::db::models::serde_helpers;

#[derive(Debug, Deserialize)]
struct LiveTypeRow {
    #[serde(default, with = "serde_helpers::option_record_id")]
    type_id: Option<RecordId>,
    count: i64,
}

#[derive(Debug, Deserialize)]
struct ArchivedTypeRow {
    #[serde(default, with = "serde_helpers::option_record_id")]
    original_type_id: Option<RecordId>,
    count: i64,
}

#[derive(Debug, Deserialize)]
struct BeneficiaryRow {
    #[serde(default)]
    beneficiaire: Option<String>,
    count: i64,
}

#[derive(Debug, Deserialize)]
struct EventRow {
    #[serde(with = "serde_helpers::record_id")]
    event: RecordId,
    count: i64,
}

#[derive(Clone)]
pub struct StatsRepository {
    base: BaseRepository,
}

impl StatsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Members per live type for a membership table (`club` / `activity`).
    pub async fn members_by_live_type(
        &self,
        member_table: &str,
    ) -> RepoResult<Vec<(RecordId, u64)>> {
        let sql = format!(
            "SELECT type_id, count() AS count FROM {} WHERE type_id != NONE GROUP BY type_id",
            member_table
        );
        let rows: Vec<LiveTypeRow> = self.base.db().query(sql).await?.take(0)?;
        Ok(rows
            .into_iter()
            .filter_map(|r| r.type_id.map(|id| (id, r.count.max(0) as u64)))
            .collect())
    }

    /// Members per archived original type: rows whose live reference was
    /// cleared by a type deletion.
    pub async fn members_by_archived_type(
        &self,
        member_table: &str,
    ) -> RepoResult<Vec<(RecordId, u64)>> {
        let sql = format!(
            "SELECT original_type_id, count() AS count FROM {} WHERE type_id = NONE AND original_type_id != NONE GROUP BY original_type_id",
            member_table
        );
        let rows: Vec<ArchivedTypeRow> = self.base.db().query(sql).await?.take(0)?;
        Ok(rows
            .into_iter()
            .filter_map(|r| r.original_type_id.map(|id| (id, r.count.max(0) as u64)))
            .collect())
    }

    /// Members per beneficiary kind.
    pub async fn members_by_beneficiary(
        &self,
        member_table: &str,
    ) -> RepoResult<Vec<(String, u64)>> {
        let sql = format!(
            "SELECT beneficiaire, count() AS count FROM {} GROUP BY beneficiaire",
            member_table
        );
        let rows: Vec<BeneficiaryRow> = self.base.db().query(sql).await?.take(0)?;
        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.beneficiaire.unwrap_or_else(|| "Non spécifié".to_string()),
                    r.count.max(0) as u64,
                )
            })
            .collect())
    }

    /// Registrations recorded per event.
    pub async fn registrations_by_event(&self) -> RepoResult<Vec<(RecordId, u64)>> {
        let rows: Vec<EventRow> = self
            .base
            .db()
            .query("SELECT event, count() AS count FROM inscription GROUP BY event")
            .await?
            .take(0)?;
        Ok(rows
            .into_iter()
            .map(|r| (r.event, r.count.max(0) as u64))
            .collect())
    }
}
