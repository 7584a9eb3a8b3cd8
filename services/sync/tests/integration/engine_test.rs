use uuid::Uuid;

use fluxpos_domain::entity::EntityKind;
use fluxpos_domain::outbox::OutboxAction;
use fluxpos_sync::domain::types::{DrainOutcome, RemoteErrorKind, TriggerEvent};
use fluxpos_sync::state::SyncEngine;
use fluxpos_sync::trigger;
use fluxpos_testing::fixture;

use crate::helpers::{MockCacheRepo, MockOutboxRepo, MockRemoteBackend, RemoteCall, ScriptedProbe};

fn engine(
    outbox: MockOutboxRepo,
    cache: MockCacheRepo,
    backend: MockRemoteBackend,
    probe: ScriptedProbe,
) -> (
    SyncEngine<MockOutboxRepo, MockCacheRepo, MockRemoteBackend, ScriptedProbe>,
    trigger::TriggerHandle,
) {
    let (handle, _rx) = trigger::channel(16);
    let engine = SyncEngine::new(
        outbox,
        cache,
        backend,
        probe,
        handle.clone(),
        fixture::location_id(),
        200,
    );
    (engine, handle)
}

#[tokio::test]
async fn should_reconcile_after_a_completed_drain() {
    let backend = MockRemoteBackend::new();
    let cache = MockCacheRepo::new();
    let (engine, _handle) = engine(
        MockOutboxRepo::new(),
        cache.clone(),
        backend.clone(),
        ScriptedProbe::online(),
    );

    let outcome = engine.sync(TriggerEvent::Manual).await.unwrap();

    assert!(matches!(outcome, DrainOutcome::Completed(_)));
    assert!(!cache.replaces.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_not_reconcile_when_offline() {
    let backend = MockRemoteBackend::new();
    let cache = MockCacheRepo::new();
    let (engine, _handle) = engine(
        MockOutboxRepo::new(),
        cache.clone(),
        backend.clone(),
        ScriptedProbe::offline(),
    );

    let outcome = engine.sync(TriggerEvent::Startup).await.unwrap();

    assert_eq!(outcome, DrainOutcome::Offline);
    assert!(backend.calls.lock().unwrap().is_empty());
    assert!(cache.replaces.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_deliver_enqueued_work_on_the_next_sync_pass() {
    let outbox = MockOutboxRepo::new();
    let backend = MockRemoteBackend::new();
    let (engine, _handle) = engine(
        outbox.clone(),
        MockCacheRepo::new(),
        backend.clone(),
        ScriptedProbe::online(),
    );

    engine
        .enqueue
        .execute(fixture::new_supplier_record("Alpha"))
        .await
        .unwrap();
    engine.sync(TriggerEvent::Enqueued).await.unwrap();

    assert!(backend
        .mutation_calls()
        .iter()
        .any(|c| matches!(c, RemoteCall::Insert { table, .. } if table == "suppliers")));
    assert_eq!(engine.status.counts().await.unwrap().synced, 1);
}

#[tokio::test]
async fn should_retry_failed_records_on_manual_request() {
    let broken = Uuid::new_v4();
    let record = fixture::pending_record(
        1,
        EntityKind::Suppliers,
        OutboxAction::Insert,
        fixture::supplier_row(broken, "Flaky"),
    );
    let outbox = MockOutboxRepo::with_pending(vec![record]);
    let backend = MockRemoteBackend::new();
    backend.fail_id(broken, RemoteErrorKind::Internal);
    let (engine, _handle) = engine(
        outbox.clone(),
        MockCacheRepo::new(),
        backend.clone(),
        ScriptedProbe::online(),
    );

    engine.sync(TriggerEvent::Startup).await.unwrap();
    assert_eq!(engine.status.counts().await.unwrap().failed, 1);

    let moved = engine.status.retry_failed().await.unwrap();
    assert_eq!(moved, 1);
    assert_eq!(engine.status.counts().await.unwrap().pending, 1);
}
