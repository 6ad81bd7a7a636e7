//! Archive-on-delete lifecycle for the type registries.

use club_server::db::DbService;
use club_server::db::models::{ClubCreate, TypeRecordCreate, TypeRecordUpdate};
use club_server::db::repository::{
    ACTIVITY_TYPES, CLUB_TYPES, ClubRepository, RepoError, TypeRegistryRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn memory_db() -> Surreal<Db> {
    DbService::memory().await.expect("in-memory db").db
}

fn club(matricule: &str, type_id: Option<String>) -> ClubCreate {
    ClubCreate {
        matricule: matricule.to_string(),
        nom: "Ben Salah".to_string(),
        prenom: "Amine".to_string(),
        age: None,
        beneficiaire: "Agent TT".to_string(),
        type_id,
    }
}

#[tokio::test]
async fn create_rejects_blank_names() {
    let db = memory_db().await;
    let registry = TypeRegistryRepository::new(db, CLUB_TYPES);

    let err = registry
        .create(TypeRecordCreate {
            name: "   ".to_string(),
        })
        .await
        .expect_err("blank name must be rejected");
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn create_trims_and_starts_active() {
    let db = memory_db().await;
    let registry = TypeRegistryRepository::new(db, CLUB_TYPES);

    let created = registry
        .create(TypeRecordCreate {
            name: "  Football ".to_string(),
        })
        .await
        .expect("create type");

    assert_eq!(created.name, "Football");
    assert_eq!(created.status, "en cours");
    assert!(created.id.is_some());
}

#[tokio::test]
async fn update_renames_and_can_override_status() {
    let db = memory_db().await;
    let registry = TypeRegistryRepository::new(db, CLUB_TYPES);

    let created = registry
        .create(TypeRecordCreate {
            name: "Handball".to_string(),
        })
        .await
        .expect("create type");
    let id = created.id.expect("id").to_string();

    let renamed = registry
        .update(
            &id,
            TypeRecordUpdate {
                name: "Handball Club".to_string(),
                status: None,
            },
        )
        .await
        .expect("update");
    assert_eq!(renamed.name, "Handball Club");
    assert_eq!(renamed.status, "en cours");

    let expired = registry
        .update(
            &id,
            TypeRecordUpdate {
                name: "Handball Club".to_string(),
                status: Some("expiré".to_string()),
            },
        )
        .await
        .expect("update with status");
    assert_eq!(expired.status, "expiré");
}

#[tokio::test]
async fn deleting_a_type_archives_it_and_detaches_members() {
    let db = memory_db().await;
    let registry = TypeRegistryRepository::new(db.clone(), CLUB_TYPES);
    let clubs = ClubRepository::new(db.clone());

    let football = registry
        .create(TypeRecordCreate {
            name: "Football".to_string(),
        })
        .await
        .expect("create type");
    let football_id = football.id.clone().expect("id");
    let id_str = football_id.to_string();

    for matricule in ["A0001", "A0002", "A0003"] {
        clubs
            .create(club(matricule, Some(id_str.clone())))
            .await
            .expect("create member");
    }

    // All three members resolve against the live type first
    let resolver = registry.load_resolver().await.expect("resolver");
    for member in clubs.find_all().await.expect("members") {
        assert_eq!(
            resolver.resolve(member.type_id.as_ref(), member.original_type_id.as_ref()),
            "Football (En cours)"
        );
    }

    registry
        .delete(&id_str, Some("admin".to_string()))
        .await
        .expect("delete type");

    // The live row is gone
    assert!(registry.find_by_id(&id_str).await.expect("lookup").is_none());

    // One archive row, carrying the name and the actor
    let archives = registry.find_all_archived().await.expect("archives");
    assert_eq!(archives.len(), 1);
    assert_eq!(archives[0].name, "Football");
    assert_eq!(archives[0].type_id.to_string(), id_str);
    assert_eq!(archives[0].deleted_by.as_deref(), Some("admin"));

    // No member was destroyed; every one now points at the archived id
    let members = clubs.find_all().await.expect("members");
    assert_eq!(members.len(), 3);
    let resolver = registry.load_resolver().await.expect("resolver");
    for member in &members {
        assert!(member.type_id.is_none());
        assert_eq!(
            member.original_type_id.as_ref().map(|t| t.to_string()),
            Some(id_str.clone())
        );
        assert_eq!(
            resolver.resolve(member.type_id.as_ref(), member.original_type_id.as_ref()),
            "Football (Expiré)"
        );
    }
}

#[tokio::test]
async fn deleting_a_missing_type_is_not_found() {
    let db = memory_db().await;
    let registry = TypeRegistryRepository::new(db, CLUB_TYPES);

    let err = registry
        .delete("club_type:missing", None)
        .await
        .expect_err("missing type");
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn member_without_type_resolves_unassigned() {
    let db = memory_db().await;
    let registry = TypeRegistryRepository::new(db.clone(), CLUB_TYPES);
    let clubs = ClubRepository::new(db);

    let member = clubs.create(club("A0009", None)).await.expect("create");
    assert!(member.type_id.is_none());
    assert!(member.original_type_id.is_none());

    let resolver = registry.load_resolver().await.expect("resolver");
    assert_eq!(
        resolver.resolve(member.type_id.as_ref(), member.original_type_id.as_ref()),
        "Non assigné"
    );
}

#[tokio::test]
async fn member_creation_rejects_unknown_type() {
    let db = memory_db().await;
    let clubs = ClubRepository::new(db);

    let err = clubs
        .create(club("A0010", Some("club_type:ghost".to_string())))
        .await
        .expect_err("unknown type must be rejected");
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn activity_registry_follows_the_same_lifecycle() {
    let db = memory_db().await;
    let registry = TypeRegistryRepository::new(db, ACTIVITY_TYPES);

    let natation = registry
        .create(TypeRecordCreate {
            name: "Natation".to_string(),
        })
        .await
        .expect("create type");
    let id = natation.id.expect("id").to_string();

    registry.delete(&id, None).await.expect("delete");

    let archives = registry.find_all_archived().await.expect("archives");
    assert_eq!(archives.len(), 1);
    assert_eq!(archives[0].name, "Natation");
    assert!(archives[0].deleted_by.is_none());
    assert!(registry.find_by_id(&id).await.expect("lookup").is_none());
}
