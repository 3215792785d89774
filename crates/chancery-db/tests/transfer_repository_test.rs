//! Integration tests for the Transfer repository implementation using
//! in-memory SurrealDB.

use chancery_core::error::ChanceryError;
use chancery_core::models::transfer::{CreateTransfer, TransferStatus};
use chancery_core::models::world::CreateWorld;
use chancery_core::repository::{TransferRepository, WorldRepository};
use chancery_db::repository::{SurrealTransferRepository, SurrealWorldRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB, run migrations, create two worlds.
async fn setup() -> (
    SurrealTransferRepository<surrealdb::engine::local::Db>,
    Uuid, // source world id
    Uuid, // target world id
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    chancery_db::run_migrations(&db).await.unwrap();

    let world_repo = SurrealWorldRepository::new(db.clone());
    let source = world_repo
        .create(CreateWorld {
            code: "JDE".into(),
            name: "Judicial Enforcement".into(),
            description: String::new(),
            theme: None,
        })
        .await
        .unwrap();
    let target = world_repo
        .create(CreateWorld {
            code: "DBCS".into(),
            name: "Debt Collection".into(),
            description: String::new(),
            theme: None,
        })
        .await
        .unwrap();

    (SurrealTransferRepository::new(db), source.id, target.id)
}

fn input(source_world: Uuid, target_world: Uuid) -> CreateTransfer {
    let dossier = Uuid::new_v4();
    CreateTransfer {
        transfer_type: "jurisdiction-change".into(),
        source_dossier_id: dossier,
        // Re-homed rather than copied; ids may also differ.
        target_dossier_id: dossier,
        source_world_id: source_world,
        target_world_id: target_world,
    }
}

#[tokio::test]
async fn schedule_creates_a_scheduled_transfer() {
    let (repo, source_world, target_world) = setup().await;

    let transfer = repo.schedule(input(source_world, target_world)).await.unwrap();

    assert_eq!(transfer.status, TransferStatus::Scheduled);
    assert!(transfer.transferred_at.is_none());
    assert_eq!(transfer.source_world_id, source_world);
    assert_eq!(transfer.target_world_id, target_world);

    let fetched = repo.get_by_id(transfer.id).await.unwrap();
    assert_eq!(fetched, transfer);
}

#[tokio::test]
async fn schedule_rejects_same_world_transfer() {
    let (repo, source_world, _) = setup().await;

    let err = repo
        .schedule(input(source_world, source_world))
        .await
        .unwrap_err();

    assert!(matches!(err, ChanceryError::Validation { .. }));
}

#[tokio::test]
async fn complete_stamps_transferred_at() {
    let (repo, source_world, target_world) = setup().await;
    let scheduled = repo.schedule(input(source_world, target_world)).await.unwrap();

    let completed = repo.complete(scheduled.id).await.unwrap();

    assert_eq!(completed.status, TransferStatus::Completed);
    assert!(completed.transferred_at.is_some());
}

#[tokio::test]
async fn cancel_leaves_no_timestamp() {
    let (repo, source_world, target_world) = setup().await;
    let scheduled = repo.schedule(input(source_world, target_world)).await.unwrap();

    let cancelled = repo.cancel(scheduled.id).await.unwrap();

    assert_eq!(cancelled.status, TransferStatus::Cancelled);
    assert!(cancelled.transferred_at.is_none());
}

#[tokio::test]
async fn terminal_records_are_immutable() {
    let (repo, source_world, target_world) = setup().await;

    let completed = {
        let t = repo.schedule(input(source_world, target_world)).await.unwrap();
        repo.complete(t.id).await.unwrap()
    };
    let cancelled = {
        let t = repo.schedule(input(source_world, target_world)).await.unwrap();
        repo.cancel(t.id).await.unwrap()
    };

    for id in [completed.id, cancelled.id] {
        let err = repo.complete(id).await.unwrap_err();
        assert!(matches!(err, ChanceryError::InvalidTransition { .. }));
        let err = repo.cancel(id).await.unwrap_err();
        assert!(matches!(err, ChanceryError::InvalidTransition { .. }));
    }
}

#[tokio::test]
async fn completed_listing_matches_either_side_of_the_dossier() {
    let (repo, world_a, world_b) = setup().await;
    let dossier = Uuid::new_v4();
    let other = Uuid::new_v4();

    // Dossier as target.
    let incoming = repo
        .schedule(CreateTransfer {
            transfer_type: "jurisdiction-change".into(),
            source_dossier_id: other,
            target_dossier_id: dossier,
            source_world_id: world_a,
            target_world_id: world_b,
        })
        .await
        .unwrap();
    repo.complete(incoming.id).await.unwrap();

    // Dossier as source.
    let outgoing = repo
        .schedule(CreateTransfer {
            transfer_type: "escalation".into(),
            source_dossier_id: dossier,
            target_dossier_id: Uuid::new_v4(),
            source_world_id: world_b,
            target_world_id: world_a,
        })
        .await
        .unwrap();
    repo.complete(outgoing.id).await.unwrap();

    // Unrelated transfer must not appear.
    let unrelated = repo
        .schedule(CreateTransfer {
            transfer_type: "jurisdiction-change".into(),
            source_dossier_id: Uuid::new_v4(),
            target_dossier_id: Uuid::new_v4(),
            source_world_id: world_a,
            target_world_id: world_b,
        })
        .await
        .unwrap();
    repo.complete(unrelated.id).await.unwrap();

    let listed = repo.list_completed_for_dossier(dossier).await.unwrap();

    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|t| t.status == TransferStatus::Completed));
    assert!(
        listed
            .iter()
            .any(|t| t.id == incoming.id && t.target_dossier_id == dossier)
    );
    assert!(
        listed
            .iter()
            .any(|t| t.id == outgoing.id && t.source_dossier_id == dossier)
    );
}

#[tokio::test]
async fn scheduled_and_cancelled_are_filtered_store_side() {
    let (repo, world_a, world_b) = setup().await;
    let dossier = Uuid::new_v4();

    // One of each status touching the dossier.
    let completed = repo
        .schedule(CreateTransfer {
            transfer_type: "jurisdiction-change".into(),
            source_dossier_id: Uuid::new_v4(),
            target_dossier_id: dossier,
            source_world_id: world_a,
            target_world_id: world_b,
        })
        .await
        .unwrap();
    repo.complete(completed.id).await.unwrap();

    repo.schedule(CreateTransfer {
        transfer_type: "jurisdiction-change".into(),
        source_dossier_id: dossier,
        target_dossier_id: Uuid::new_v4(),
        source_world_id: world_b,
        target_world_id: world_a,
    })
    .await
    .unwrap();

    let cancelled = repo
        .schedule(CreateTransfer {
            transfer_type: "escalation".into(),
            source_dossier_id: dossier,
            target_dossier_id: Uuid::new_v4(),
            source_world_id: world_b,
            target_world_id: world_a,
        })
        .await
        .unwrap();
    repo.cancel(cancelled.id).await.unwrap();

    let listed = repo.list_completed_for_dossier(dossier).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, completed.id);
}

#[tokio::test]
async fn listing_is_most_recent_first() {
    let (repo, world_a, world_b) = setup().await;
    let dossier = Uuid::new_v4();

    let mut completed_ids = Vec::new();
    for _ in 0..3 {
        let t = repo
            .schedule(CreateTransfer {
                transfer_type: "jurisdiction-change".into(),
                source_dossier_id: Uuid::new_v4(),
                target_dossier_id: dossier,
                source_world_id: world_a,
                target_world_id: world_b,
            })
            .await
            .unwrap();
        completed_ids.push(repo.complete(t.id).await.unwrap());
    }

    let listed = repo.list_completed_for_dossier(dossier).await.unwrap();

    assert_eq!(listed.len(), 3);
    for window in listed.windows(2) {
        assert!(window[0].transferred_at >= window[1].transferred_at);
    }
}

#[tokio::test]
async fn no_history_is_an_empty_list() {
    let (repo, _, _) = setup().await;

    let listed = repo.list_completed_for_dossier(Uuid::new_v4()).await.unwrap();

    assert!(listed.is_empty());
}
