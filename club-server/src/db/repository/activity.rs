//! Sport activity membership repository

use chrono::Utc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Activity, ActivityCreate, TypeRecord};

const TABLE: &str = "activity";
const TYPE_TABLE: &str = "activity_type";

#[derive(Clone)]
pub struct ActivityRepository {
    base: BaseRepository,
}

impl ActivityRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all participations, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Activity>> {
        let activities: Vec<Activity> = self
            .base
            .db()
            .query("SELECT * FROM activity ORDER BY date_inscription DESC")
            .await?
            .take(0)?;
        Ok(activities)
    }

    /// Find participation by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Activity>> {
        let rid = parse_record_id(TABLE, id)?;
        let activity: Option<Activity> = self.base.db().select(rid).await?;
        Ok(activity)
    }

    /// Participations currently referencing a live type
    pub async fn find_by_type(&self, type_id: &RecordId) -> RepoResult<Vec<Activity>> {
        let activities: Vec<Activity> = self
            .base
            .db()
            .query("SELECT * FROM activity WHERE type_id = $type_id")
            .bind(("type_id", type_id.clone()))
            .await?
            .take(0)?;
        Ok(activities)
    }

    /// Create a participation; same contract as the club variant.
    pub async fn create(&self, data: ActivityCreate) -> RepoResult<Activity> {
        let type_ref = self.resolve_type_ref(data.type_id.as_deref()).await?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE activity SET
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
            .take::<Option<Activity>>(0)?
            .ok_or_else(|| RepoError::Database("Failed to create activity".to_string()))
    }

    /// Persist a fully merged participation.
    pub async fn update(&self, id: &str, activity: &Activity) -> RepoResult<Activity> {
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
            .bind(("matricule", activity.matricule.clone()))
            .bind(("nom", activity.nom.clone()))
            .bind(("prenom", activity.prenom.clone()))
            .bind(("age", activity.age))
            .bind(("beneficiaire", activity.beneficiaire.clone()))
            .bind(("type_ref", activity.type_id.clone()))
            .bind(("original_type_ref", activity.original_type_id.clone()))
            .await?;

        result
            .take::<Option<Activity>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Activity {} not found", id)))
    }

    /// Hard delete a participation
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(TABLE, id)?;
        let existing: Option<Activity> = self.base.db().select(rid.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!("Activity {} not found", id)));
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", rid))
            .await?
            .check()?;
        Ok(true)
    }

    /// Resolve an optional type id into a live record reference.
    pub async fn resolve_type_ref(&self, type_id: Option<&str>) -> RepoResult<Option<RecordId>> {
        match type_id {
            None => Ok(None),
            Some(raw) => {
                let rid = parse_record_id(TYPE_TABLE, raw)?;
                let record: Option<TypeRecord> = self.base.db().select(rid.clone()).await?;
                if record.is_none() {
                    return Err(RepoError::NotFound(format!(
                        "Type d'activité {} non trouvé",
                        raw
                    )));
                }
                Ok(Some(rid))
            }
        }
    }
}
