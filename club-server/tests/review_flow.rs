//! Review uniqueness per (event, user).

use chrono::{NaiveDate, NaiveTime};
use club_server::db::DbService;
use club_server::db::models::UserCreate;
use club_server::db::repository::{EventRepository, RepoError, ReviewRepository, UserRepository};
use rust_decimal::Decimal;
use shared::Sentiment;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn memory_db() -> Surreal<Db> {
    DbService::memory().await.expect("in-memory db").db
}

async fn seed_event(db: &Surreal<Db>) -> RecordId {
    EventRepository::new(db.clone())
        .create(
            "Marathon".to_string(),
            NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            "Nabeul".to_string(),
            100,
            Decimal::new(20, 0),
            None,
        )
        .await
        .expect("create event")
        .id
        .expect("event id")
}

async fn seed_user(db: &Surreal<Db>, matricule: &str, login: &str) -> RecordId {
    UserRepository::new(db.clone())
        .create(UserCreate {
            matricule: matricule.to_string(),
            nom: "Ben Salah".to_string(),
            prenom: "Amine".to_string(),
            email: format!("{}@example.tn", login),
            telephone: "+216 71 000 000".to_string(),
            login: login.to_string(),
            password: "s3cret".to_string(),
            residence_administrative: None,
        })
        .await
        .expect("create user")
        .id
        .expect("user id")
}

fn sentiment(stars: i64) -> Sentiment {
    Sentiment {
        label: "POSITIVE".to_string(),
        score: 0.97,
        stars,
    }
}

#[tokio::test]
async fn one_review_per_event_and_user() {
    let db = memory_db().await;
    let event = seed_event(&db).await;
    let user = seed_user(&db, "A1234", "amine").await;
    let repo = ReviewRepository::new(db);

    repo.create(
        event.clone(),
        user.clone(),
        "A1234".to_string(),
        Some("Ben Salah".to_string()),
        Some("Amine".to_string()),
        5,
        "Très bonne organisation".to_string(),
        sentiment(5),
    )
    .await
    .expect("first review");

    let err = repo
        .create(
            event.clone(),
            user.clone(),
            "A1234".to_string(),
            None,
            None,
            2,
            "Changement d'avis".to_string(),
            sentiment(2),
        )
        .await
        .expect_err("second review for the same event+user must be rejected");
    assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");
}

#[tokio::test]
async fn different_users_can_review_the_same_event() {
    let db = memory_db().await;
    let event = seed_event(&db).await;
    let first = seed_user(&db, "A1234", "amine").await;
    let second = seed_user(&db, "B5678", "rym").await;
    let repo = ReviewRepository::new(db);

    repo.create(
        event.clone(),
        first,
        "A1234".to_string(),
        None,
        None,
        4,
        "Bien".to_string(),
        sentiment(4),
    )
    .await
    .expect("first user review");

    repo.create(
        event.clone(),
        second,
        "B5678".to_string(),
        None,
        None,
        3,
        "Moyen".to_string(),
        sentiment(3),
    )
    .await
    .expect("second user review");

    let rows = repo.find_by_event(&event).await.expect("reviews");
    assert_eq!(rows.len(), 2);
}
