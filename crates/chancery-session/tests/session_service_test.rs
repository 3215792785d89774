//! Integration tests for the session service over in-memory SurrealDB.

use std::sync::Arc;

use chancery_core::access::AccessControl;
use chancery_core::error::ChanceryError;
use chancery_core::models::principal::{Principal, Profile};
use chancery_core::models::role::Role;
use chancery_core::models::world::{CreateWorld, World};
use chancery_core::repository::{GrantRepository, WorldRepository};
use chancery_db::repository::{SurrealGrantRepository, SurrealWorldRepository};
use chancery_session::{SessionConfig, SessionService};
use chrono::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

/// Spin up in-memory DB, run migrations, create two worlds.
async fn setup() -> (
    SurrealGrantRepository<Db>,
    SurrealWorldRepository<Db>,
    World, // JDE
    World, // DBCS
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    chancery_db::run_migrations(&db).await.unwrap();

    let worlds = SurrealWorldRepository::new(db.clone());
    let jde = worlds
        .create(CreateWorld {
            code: "JDE".into(),
            name: "Judicial Enforcement".into(),
            description: String::new(),
            theme: None,
        })
        .await
        .unwrap();
    let dbcs = worlds
        .create(CreateWorld {
            code: "DBCS".into(),
            name: "Debt Collection".into(),
            description: String::new(),
            theme: None,
        })
        .await
        .unwrap();

    (SurrealGrantRepository::new(db), worlds, jde, dbcs)
}

fn principal() -> Principal {
    Principal {
        id: Uuid::new_v4(),
        username: "mallory".into(),
        email: "mallory@example.com".into(),
    }
}

fn service(
    grants: SurrealGrantRepository<Db>,
    access: Arc<AccessControl>,
) -> SessionService<SurrealGrantRepository<Db>> {
    SessionService::new(grants, access, SessionConfig::default())
}

#[tokio::test]
async fn begin_installs_grants_into_access_control() {
    let (grants, _worlds, jde, _dbcs) = setup().await;
    let p = principal();
    grants.assign_role(p.id, Role::Editor).await.unwrap();
    grants.add_world_member(p.id, jde.id).await.unwrap();

    let access = Arc::new(AccessControl::new());
    let svc = service(grants, Arc::clone(&access));

    let session = svc
        .begin(
            p.clone(),
            Some(Profile {
                full_name: "Mallory Vane".into(),
                locale: "en-GB".into(),
            }),
        )
        .await
        .unwrap();

    assert_eq!(session.principal_id, p.id);
    assert!(!access.is_super_admin());
    assert!(access.has_world_access("JDE"));
    assert!(!access.has_world_access("DBCS"));

    let state = access.snapshot();
    assert_eq!(state.principal.unwrap().id, p.id);
    assert_eq!(state.session.unwrap().id, session.id);
    assert_eq!(state.profile.unwrap().full_name, "Mallory Vane");
}

#[tokio::test]
async fn session_lifetime_follows_configuration() {
    let (grants, _worlds, _jde, _dbcs) = setup().await;
    let access = Arc::new(AccessControl::new());
    let svc = SessionService::new(
        grants,
        Arc::clone(&access),
        SessionConfig {
            session_lifetime_secs: 900,
        },
    );

    let session = svc.begin(principal(), None).await.unwrap();

    assert_eq!(
        session.expires_at - session.started_at,
        Duration::seconds(900)
    );
}

#[tokio::test]
async fn principal_without_grants_gets_an_empty_session() {
    let (grants, _worlds, _jde, _dbcs) = setup().await;
    let access = Arc::new(AccessControl::new());
    let svc = service(grants, Arc::clone(&access));

    svc.begin(principal(), None).await.unwrap();

    assert!(!access.is_super_admin());
    assert!(!access.has_world_access("JDE"));
}

#[tokio::test]
async fn end_resets_every_gate() {
    let (grants, _worlds, jde, _dbcs) = setup().await;
    let p = principal();
    grants.assign_role(p.id, Role::SuperAdmin).await.unwrap();
    grants.add_world_member(p.id, jde.id).await.unwrap();

    let access = Arc::new(AccessControl::new());
    let svc = service(grants, Arc::clone(&access));

    svc.begin(p, None).await.unwrap();
    assert!(access.is_super_admin());
    assert!(access.has_world_access("JDE"));

    svc.end();

    assert!(!access.is_super_admin());
    assert!(!access.has_world_access("JDE"));
    assert!(access.snapshot().principal.is_none());
}

#[tokio::test]
async fn refresh_picks_up_grant_changes() {
    let (grants, _worlds, jde, dbcs) = setup().await;
    let p = principal();
    grants.assign_role(p.id, Role::Viewer).await.unwrap();
    grants.add_world_member(p.id, jde.id).await.unwrap();

    let access = Arc::new(AccessControl::new());
    let svc = service(grants.clone(), Arc::clone(&access));
    svc.begin(p.clone(), None).await.unwrap();

    // Grants change in the store after login.
    grants.assign_role(p.id, Role::SuperAdmin).await.unwrap();
    grants.add_world_member(p.id, dbcs.id).await.unwrap();
    grants.remove_world_member(p.id, jde.id).await.unwrap();
    assert!(!access.is_super_admin(), "stale until refreshed");

    svc.refresh().await.unwrap();

    assert!(access.is_super_admin());
    assert!(!access.has_world_access("JDE"));
    assert!(access.has_world_access("DBCS"));
}

#[tokio::test]
async fn refresh_without_a_session_fails() {
    let (grants, _worlds, _jde, _dbcs) = setup().await;
    let access = Arc::new(AccessControl::new());
    let svc = service(grants, access);

    let err = svc.refresh().await.unwrap_err();
    assert!(matches!(err, ChanceryError::Session { .. }));
}

#[tokio::test]
async fn refreshing_an_expired_session_logs_out() {
    let (grants, _worlds, jde, _dbcs) = setup().await;
    let p = principal();
    grants.add_world_member(p.id, jde.id).await.unwrap();

    let access = Arc::new(AccessControl::new());
    let svc = SessionService::new(
        grants,
        Arc::clone(&access),
        SessionConfig {
            session_lifetime_secs: 0,
        },
    );
    svc.begin(p, None).await.unwrap();
    assert!(access.has_world_access("JDE"));

    let err = svc.refresh().await.unwrap_err();

    assert!(matches!(err, ChanceryError::Session { .. }));
    assert!(!access.has_world_access("JDE"));
    assert!(access.snapshot().principal.is_none());
}
