//! Outbox store tests against a real in-memory sqlite database.

use std::collections::HashSet;

use sea_orm::{Database, DatabaseConnection, EntityTrait};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use fluxpos_domain::entity::EntityKind;
use fluxpos_domain::outbox::OutboxAction;
use fluxpos_sync::domain::repository::{CacheRepository, OutboxRepository};
use fluxpos_sync::domain::types::{CacheOp, Collection};
use fluxpos_sync::infra::db::{DbCacheRepository, DbOutboxRepository};
use fluxpos_sync_migration::Migrator;
use fluxpos_sync_schema::suppliers;
use fluxpos_testing::fixture;

async fn test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

#[tokio::test]
async fn should_assign_monotonically_increasing_sequence_numbers() {
    let db = test_db().await;
    let repo = DbOutboxRepository { db };

    let first = fixture::pending_record(
        0,
        EntityKind::Suppliers,
        OutboxAction::Insert,
        fixture::supplier_row(Uuid::new_v4(), "Alpha"),
    );
    let second = fixture::pending_record(
        0,
        EntityKind::Suppliers,
        OutboxAction::Insert,
        fixture::supplier_row(Uuid::new_v4(), "Beta"),
    );

    assert_eq!(repo.enqueue(&first, &[]).await.unwrap(), 1);
    assert_eq!(repo.enqueue(&second, &[]).await.unwrap(), 2);
}

#[tokio::test]
async fn should_list_pending_in_enqueue_order() {
    let db = test_db().await;
    let repo = DbOutboxRepository { db };

    let mut ids = Vec::new();
    for name in ["Alpha", "Beta", "Gamma"] {
        let record = fixture::pending_record(
            0,
            EntityKind::Suppliers,
            OutboxAction::Insert,
            fixture::supplier_row(Uuid::new_v4(), name),
        );
        ids.push(record.id);
        repo.enqueue(&record, &[]).await.unwrap();
    }
    repo.mark_synced(ids[0]).await.unwrap();

    let pending = repo.list_pending().await.unwrap();
    assert_eq!(
        pending.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![ids[1], ids[2]]
    );
    assert!(pending.windows(2).all(|w| w[0].seq < w[1].seq));
}

#[tokio::test]
async fn should_track_status_transitions_and_attempts() {
    let db = test_db().await;
    let repo = DbOutboxRepository { db };

    let record = fixture::pending_record(
        0,
        EntityKind::Suppliers,
        OutboxAction::Insert,
        fixture::supplier_row(Uuid::new_v4(), "Alpha"),
    );
    repo.enqueue(&record, &[]).await.unwrap();

    repo.mark_failed(record.id, "INTERNAL: boom").await.unwrap();
    let counts = repo.counts().await.unwrap();
    assert_eq!((counts.pending, counts.failed), (0, 1));

    assert_eq!(repo.reset_failed().await.unwrap(), 1);
    let reloaded = repo.list_pending().await.unwrap();
    assert_eq!(reloaded[0].attempt_count, 1);
    // A reset record starts its retry with a clean slate; the old failure
    // message must not linger.
    assert_eq!(reloaded[0].last_error, None);

    repo.mark_synced(record.id).await.unwrap();
    let counts = repo.counts().await.unwrap();
    assert_eq!((counts.pending, counts.synced, counts.failed), (0, 1, 0));
}

#[tokio::test]
async fn should_apply_optimistic_cache_writes_in_the_enqueue_transaction() {
    let db = test_db().await;
    let repo = DbOutboxRepository { db: db.clone() };

    let supplier_id = Uuid::new_v4();
    let row = fixture::supplier_row(supplier_id, "Alpha");
    let record = fixture::pending_record(
        0,
        EntityKind::Suppliers,
        OutboxAction::Insert,
        row.clone(),
    );
    repo.enqueue(
        &record,
        &[CacheOp::Upsert {
            collection: Collection::Suppliers,
            row,
        }],
    )
    .await
    .unwrap();

    let cached = suppliers::Entity::find_by_id(supplier_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cached.name, "Alpha");

    // A delete op removes the cached row again.
    let record = fixture::pending_record(
        0,
        EntityKind::Suppliers,
        OutboxAction::Delete,
        serde_json::json!({ "id": supplier_id }),
    );
    repo.enqueue(
        &record,
        &[CacheOp::Delete {
            collection: Collection::Suppliers,
            id: supplier_id,
        }],
    )
    .await
    .unwrap();
    assert!(suppliers::Entity::find_by_id(supplier_id)
        .one(&db)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn should_replace_a_collection_but_leave_shielded_rows_alone() {
    let db = test_db().await;
    let cache = DbCacheRepository { db: db.clone() };

    let shielded_id = Uuid::new_v4();
    let stale_id = Uuid::new_v4();
    cache
        .replace_collection(
            Collection::Suppliers,
            vec![
                fixture::supplier_row(shielded_id, "Edited Offline"),
                fixture::supplier_row(stale_id, "Stale"),
            ],
            &HashSet::new(),
        )
        .await
        .unwrap();

    // The pull no longer contains `stale_id` and carries a conflicting
    // version of the shielded row.
    let fresh_id = Uuid::new_v4();
    let shield = HashSet::from([shielded_id]);
    let written = cache
        .replace_collection(
            Collection::Suppliers,
            vec![
                fixture::supplier_row(shielded_id, "Server Version"),
                fixture::supplier_row(fresh_id, "Fresh"),
            ],
            &shield,
        )
        .await
        .unwrap();
    assert_eq!(written, 1);

    let names: Vec<String> = suppliers::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert!(names.contains(&"Edited Offline".to_owned()));
    assert!(names.contains(&"Fresh".to_owned()));
    assert!(!names.contains(&"Stale".to_owned()));
    assert!(!names.contains(&"Server Version".to_owned()));
}
