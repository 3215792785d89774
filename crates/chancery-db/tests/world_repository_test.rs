//! Integration tests for the World repository implementation using
//! in-memory SurrealDB.

use chancery_core::models::world::{CreateWorld, ThemeColors, UpdateWorld};
use chancery_core::repository::{Pagination, WorldRepository};
use chancery_db::repository::SurrealWorldRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    chancery_db::run_migrations(&db).await.unwrap();
    db
}

fn create_input(code: &str, name: &str) -> CreateWorld {
    CreateWorld {
        code: code.into(),
        name: name.into(),
        description: format!("{name} business line"),
        theme: Some(ThemeColors {
            primary: "#14532d".into(),
            accent: "#16a34a".into(),
            neutral: "#6b7280".into(),
        }),
    }
}

#[tokio::test]
async fn create_and_get_world() {
    let db = setup().await;
    let repo = SurrealWorldRepository::new(db);

    let world = repo.create(create_input("JDE", "Judicial Enforcement")).await.unwrap();

    assert_eq!(world.code, "JDE");
    assert_eq!(world.name, "Judicial Enforcement");
    assert_eq!(world.theme.primary, "#14532d");

    let fetched = repo.get_by_id(world.id).await.unwrap();
    assert_eq!(fetched.id, world.id);
    assert_eq!(fetched.code, world.code);
    assert_eq!(fetched.theme, world.theme);
}

#[tokio::test]
async fn get_world_by_code() {
    let db = setup().await;
    let repo = SurrealWorldRepository::new(db);

    let world = repo.create(create_input("DBCS", "Debt Collection")).await.unwrap();

    let fetched = repo.get_by_code("DBCS").await.unwrap();
    assert_eq!(fetched.id, world.id);
    assert_eq!(fetched.code, "DBCS");

    // Codes are case-sensitive.
    let result = repo.get_by_code("dbcs").await;
    assert!(result.is_err(), "lookup must be case-sensitive");
}

#[tokio::test]
async fn default_theme_applies_when_absent() {
    let db = setup().await;
    let repo = SurrealWorldRepository::new(db);

    let world = repo
        .create(CreateWorld {
            code: "INS".into(),
            name: "Insolvency".into(),
            description: String::new(),
            theme: None,
        })
        .await
        .unwrap();

    assert_eq!(world.theme, ThemeColors::default());
}

#[tokio::test]
async fn update_world_keeps_code_immutable() {
    let db = setup().await;
    let repo = SurrealWorldRepository::new(db);

    let world = repo.create(create_input("JDE", "Before")).await.unwrap();

    let updated = repo
        .update(
            world.id,
            UpdateWorld {
                name: Some("After".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, world.id);
    assert_eq!(updated.name, "After");
    assert_eq!(updated.code, "JDE"); // unchanged
    assert!(updated.updated_at >= world.updated_at);
}

#[tokio::test]
async fn list_worlds_with_pagination() {
    let db = setup().await;
    let repo = SurrealWorldRepository::new(db);

    for (code, name) in [
        ("DBCS", "Debt Collection"),
        ("INS", "Insolvency"),
        ("JDE", "Judicial Enforcement"),
    ] {
        repo.create(create_input(code, name)).await.unwrap();
    }

    let page = repo
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].code, "DBCS");
    assert_eq!(page.items[1].code, "INS");

    let rest = repo
        .list(Pagination {
            offset: 2,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(rest.items.len(), 1);
    assert_eq!(rest.items[0].code, "JDE");
}
