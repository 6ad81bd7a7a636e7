//! Dashboard aggregation over live and archived types.

use club_server::db::DbService;
use club_server::db::models::{ClubCreate, TypeRecordCreate};
use club_server::db::repository::{CLUB_TYPES, ClubRepository, TypeRegistryRepository};
use club_server::services::DashboardService;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn memory_db() -> Surreal<Db> {
    DbService::memory().await.expect("in-memory db").db
}

fn club(matricule: &str, beneficiaire: &str, type_id: Option<String>) -> ClubCreate {
    ClubCreate {
        matricule: matricule.to_string(),
        nom: "Ben Salah".to_string(),
        prenom: "Amine".to_string(),
        age: if beneficiaire == "enfant" { Some(9) } else { None },
        beneficiaire: beneficiaire.to_string(),
        type_id,
    }
}

#[tokio::test]
async fn member_counts_follow_the_type_lifecycle() {
    let db = memory_db().await;
    let registry = TypeRegistryRepository::new(db.clone(), CLUB_TYPES);
    let clubs = ClubRepository::new(db.clone());

    let football = registry
        .create(TypeRecordCreate {
            name: "Football".to_string(),
        })
        .await
        .expect("type");
    let football_id = football.id.expect("id").to_string();

    let tennis = registry
        .create(TypeRecordCreate {
            name: "Tennis".to_string(),
        })
        .await
        .expect("type");
    let tennis_id = tennis.id.expect("id").to_string();

    clubs
        .create(club("A0001", "enfant", Some(football_id.clone())))
        .await
        .expect("member");
    clubs
        .create(club("A0002", "Agent TT", Some(football_id.clone())))
        .await
        .expect("member");
    clubs
        .create(club("A0003", "Agent TT", Some(tennis_id.clone())))
        .await
        .expect("member");

    // Before the deletion both types are live
    let stats = DashboardService::new(db.clone()).collect().await.expect("stats");
    assert_eq!(stats.archived_clubs.len(), 0);
    let football_live = stats
        .active_clubs
        .iter()
        .find(|c| c.name == "Football (En cours)")
        .expect("football series");
    assert_eq!(football_live.members, 2);

    // Archive Football: its members move to the archived series
    registry
        .delete(&football_id, Some("admin".to_string()))
        .await
        .expect("delete type");

    let stats = DashboardService::new(db.clone()).collect().await.expect("stats");
    assert!(
        stats
            .active_clubs
            .iter()
            .all(|c| c.name != "Football (En cours)")
    );
    let football_archived = stats
        .archived_clubs
        .iter()
        .find(|c| c.name == "Football (Expiré)")
        .expect("archived series");
    assert_eq!(football_archived.members, 2);

    let tennis_live = stats
        .active_clubs
        .iter()
        .find(|c| c.name == "Tennis (En cours)")
        .expect("tennis series");
    assert_eq!(tennis_live.members, 1);

    // Beneficiary breakdown counts every member regardless of lifecycle
    let enfant = stats
        .inscriptions_by_beneficiary_club
        .iter()
        .find(|b| b.beneficiary == "enfant")
        .expect("enfant series");
    assert_eq!(enfant.inscriptions, 1);
    let agent = stats
        .inscriptions_by_beneficiary_club
        .iter()
        .find(|b| b.beneficiary == "Agent TT")
        .expect("agent series");
    assert_eq!(agent.inscriptions, 2);
}
