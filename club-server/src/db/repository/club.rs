//! Club membership repository

use chrono::Utc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Club, ClubCreate, TypeRecord};

const TABLE: &str = "club";
const TYPE_TABLE: &str = "club_type";

#[derive(Clone)]
pub struct ClubRepository {
    base: BaseRepository,
}

impl ClubRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all memberships, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Club>> {
        let clubs: Vec<Club> = self
            .base
            .db()
            .query("SELECT * FROM club ORDER BY date_inscription DESC")
            .await?
            .take(0)?;
        Ok(clubs)
    }

    /// Find membership by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Club>> {
        let rid = parse_record_id(TABLE, id)?;
        let club: Option<Club> = self.base.db().select(rid).await?;
        Ok(club)
    }

    /// Memberships currently referencing a live type
    pub async fn find_by_type(&self, type_id: &RecordId) -> RepoResult<Vec<Club>> {
        let clubs: Vec<Club> = self
            .base
            .db()
            .query("SELECT * FROM club WHERE type_id = $type_id")
            .bind(("type_id", type_id.clone()))
            .await?
            .take(0)?;
        Ok(clubs)
    }

    /// Create a membership. The caller has already validated participant
    /// fields; the type reference is resolved (and required to exist) here.
    pub async fn create(&self, data: ClubCreate) -> RepoResult<Club> {
        let type_ref = self.resolve_type_ref(data.type_id.as_deref()).await?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE club SET
                    matricule = $matricule,
                    nom = $nom,
                    prenom = $prenom,
                    age = $age,
                    beneficiaire = $beneficiaire,
                    type_id = $type_ref,
                    original_type_id = $type_ref,
                    date_inscription = $now
                RETURN AFTER"#,
            )
            .bind(("matricule", data.matricule))
            .bind(("nom", data.nom))
            .bind(("prenom", data.prenom))
            .bind(("age", data.age))
            .bind(("beneficiaire", data.beneficiaire))
            .bind(("type_ref", type_ref))
            .bind(("now", Utc::now()))
            .await?;

        result
            .take::<Option<Club>>(0)?
            .ok_or_else(|| RepoError::Database("Failed to create club membership".to_string()))
    }

    /// Persist a fully merged membership (the handler applies the update
    /// payload and the age rule onto the existing row first).
    pub async fn update(&self, id: &str, club: &Club) -> RepoResult<Club> {
        let rid = parse_record_id(TABLE, id)?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    matricule = $matricule,
                    nom = $nom,
                    prenom = $prenom,
                    age = $age,
                    beneficiaire = $beneficiaire,
                    type_id = $type_ref,
                    original_type_id = $original_type_ref
                RETURN AFTER"#,
            )
            .bind(("thing", rid))
            .bind(("matricule", club.matricule.clone()))
            .bind(("nom", club.nom.clone()))
            .bind(("prenom", club.prenom.clone()))
            .bind(("age", club.age))
            .bind(("beneficiaire", club.beneficiaire.clone()))
            .bind(("type_ref", club.type_id.clone()))
            .bind(("original_type_ref", club.original_type_id.clone()))
            .await?;

        result
            .take::<Option<Club>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Club {} not found", id)))
    }

    /// Hard delete a membership
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(TABLE, id)?;
        let existing: Option<Club> = self.base.db().select(rid.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!("Club {} not found", id)));
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", rid))
            .await?
            .check()?;
        Ok(true)
    }

    /// Resolve an optional type id into a live record reference, failing
    /// when the referenced type does not exist.
    pub async fn resolve_type_ref(&self, type_id: Option<&str>) -> RepoResult<Option<RecordId>> {
        match type_id {
            None => Ok(None),
            Some(raw) => {
                let rid = parse_record_id(TYPE_TABLE, raw)?;
                let record: Option<TypeRecord> = self.base.db().select(rid.clone()).await?;
                if record.is_none() {
                    return Err(RepoError::NotFound(format!(
                        "Type de club {} non trouvé",
                        raw
                    )));
                }
                Ok(Some(rid))
            }
        }
    }
}
