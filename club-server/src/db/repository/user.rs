//! User repository

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{User, UserCreate};

const TABLE: &str = "user";

const DEFAULT_RESIDENCE: &str = "Espace TT Nabeul";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY date_inscription DESC")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let rid = parse_record_id(TABLE, id)?;
        let user: Option<User> = self.base.db().select(rid).await?;
        Ok(user)
    }

    /// Find user by login
    pub async fn find_by_login(&self, login: &str) -> RepoResult<Option<User>> {
        let login_owned = login.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE login = $login LIMIT 1")
            .bind(("login", login_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find user by matricule
    pub async fn find_by_matricule(&self, matricule: &str) -> RepoResult<Option<User>> {
        let matricule_owned = matricule.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE matricule = $matricule LIMIT 1")
            .bind(("matricule", matricule_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user account
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_matricule(&data.matricule).await?.is_some() {
            return Err(RepoError::Duplicate("La matricule existe déjà".to_string()));
        }
        if self.find_by_login(&data.login).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Le login '{}' existe déjà",
                data.login
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let residence = data
            .residence_administrative
            .unwrap_or_else(|| DEFAULT_RESIDENCE.to_string());

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    matricule = $matricule,
                    nom = $nom,
                    prenom = $prenom,
                    email = $email,
                    telephone = $telephone,
                    login = $login,
                    hash_pass = $hash_pass,
                    residence_administrative = $residence,
                    date_inscription = $now
                RETURN AFTER"#,
            )
            .bind(("matricule", data.matricule))
            .bind(("nom", data.nom))
            .bind(("prenom", data.prenom))
            .bind(("email", data.email))
            .bind(("telephone", data.telephone))
            .bind(("login", data.login))
            .bind(("hash_pass", hash_pass))
            .bind(("residence", residence))
            .bind(("now", Utc::now()))
            .await?;

        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Persist a fully merged user. `new_password` is hashed here when set.
    pub async fn update(
        &self,
        id: &str,
        user: &User,
        new_password: Option<&str>,
    ) -> RepoResult<User> {
        let rid = parse_record_id(TABLE, id)?;

        // Matricule stays unique across accounts
        if let Some(other) = self.find_by_matricule(&user.matricule).await?
            && other.id.as_ref().map(|t| t.to_string()) != Some(rid.to_string())
        {
            return Err(RepoError::Duplicate("La matricule existe déjà".to_string()));
        }

        let hash_pass = match new_password {
            Some(password) => User::hash_password(password)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?,
            None => user.hash_pass.clone(),
        };

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    matricule = $matricule,
                    nom = $nom,
                    prenom = $prenom,
                    email = $email,
                    telephone = $telephone,
                    login = $login,
                    hash_pass = $hash_pass,
                    residence_administrative = $residence
                RETURN AFTER"#,
            )
            .bind(("thing", rid))
            .bind(("matricule", user.matricule.clone()))
            .bind(("nom", user.nom.clone()))
            .bind(("prenom", user.prenom.clone()))
            .bind(("email", user.email.clone()))
            .bind(("telephone", user.telephone.clone()))
            .bind(("login", user.login.clone()))
            .bind(("hash_pass", hash_pass))
            .bind(("residence", user.residence_administrative.clone()))
            .await?;

        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Utilisateur {} non trouvé", id)))
    }

    /// Hard delete a user
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(TABLE, id)?;
        let existing: Option<User> = self.base.db().select(rid.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound(format!("Utilisateur {} non trouvé", id)));
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
