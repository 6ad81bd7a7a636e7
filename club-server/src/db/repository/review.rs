//! Review repository

use chrono::Utc;
use shared::Sentiment;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::Review;

const TABLE: &str = "review";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all reviews, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Review>> {
        let rows: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Find review by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let rid = parse_record_id(TABLE, id)?;
        let row: Option<Review> = self.base.db().select(rid).await?;
        Ok(row)
    }

    /// Reviews left for one event
    pub async fn find_by_event(&self, event: &RecordId) -> RepoResult<Vec<Review>> {
        let rows: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE event = $event ORDER BY created_at DESC")
            .bind(("event", event.clone()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// The review a user left for an event, if any
    pub async fn find_by_event_and_user(
        &self,
        event: &RecordId,
        user: &RecordId,
    ) -> RepoResult<Option<Review>> {
        let rows: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE event = $event AND user = $user LIMIT 1")
            .bind(("event", event.clone()))
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Persist a review. One review per (event, user).
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        event: RecordId,
        user: RecordId,
        matricule: String,
        nom: Option<String>,
        prenom: Option<String>,
        rating: i64,
        comment: String,
        sentiment: Sentiment,
    ) -> RepoResult<Review> {
        if self.find_by_event_and_user(&event, &user).await?.is_some() {
            return Err(RepoError::Duplicate(
                "Vous avez déjà soumis un avis pour cet événement".to_string(),
            ));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE review SET
                    event = $event,
                    user = $user,
                    matricule = $matricule,
                    nom = $nom,
                    prenom = $prenom,
                    rating = $rating,
                    comment = $comment,
                    sentiment = $sentiment,
                    created_at = $now
                RETURN AFTER"#,
            )
            .bind(("event", event))
            .bind(("user", user))
            .bind(("matricule", matricule))
            .bind(("nom", nom))
            .bind(("prenom", prenom))
            .bind(("rating", rating))
            .bind(("comment", comment))
            .bind(("sentiment", sentiment))
            .bind(("now", Utc::now()))
            .await?;

        result
            .take::<Option<Review>>(0)?
            .ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    /// Hard delete a review
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(TABLE, id)?;
        let existing: Option<Review> = self.base.db().select(rid.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!("Avis {} non trouvé", id)));
        }

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", rid))
            .await?
            .check()?;
        Ok(true)
    }
}
