//! User account model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

/// A staff account. The password hash is never serialized out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub matricule: String,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: String,
    pub login: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub residence_administrative: String,
    pub date_inscription: DateTime<Utc>,
}

impl User {
    /// Verify a candidate password against the stored argon2 hash.
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using argon2 with a random salt.
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

/// Create payload (self-service registration)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1, max = 5, message = "matricule must be 1-5 characters"))]
    pub matricule: String,
    #[validate(length(min = 1))]
    pub nom: String,
    #[validate(length(min = 1))]
    pub prenom: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub telephone: String,
    #[validate(length(min = 1))]
    pub login: String,
    #[validate(length(min = 4, message = "password must be at least 4 characters"))]
    pub password: String,
    pub residence_administrative: Option<String>,
}

/// Update payload; all fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub matricule: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub residence_administrative: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = User::hash_password("s3cret").expect("hash");
        let user = User {
            id: None,
            matricule: "A1234".into(),
            nom: "Ben Salah".into(),
            prenom: "Amine".into(),
            email: "amine@example.tn".into(),
            telephone: "+216 71 000 000".into(),
            login: "amine".into(),
            hash_pass: hash,
            residence_administrative: "Direction".into(),
            date_inscription: Utc::now(),
        };

        assert!(user.verify_password("s3cret").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }
}
