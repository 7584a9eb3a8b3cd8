use std::sync::Arc;

use serde_json::json;
use tokio::sync::Semaphore;
use uuid::Uuid;

use fluxpos_domain::entity::EntityKind;
use fluxpos_domain::outbox::{OutboxAction, OutboxStatus};
use fluxpos_sync::domain::repository::OutboxRepository as _;
use fluxpos_sync::domain::types::{DrainOutcome, DrainReport, RemoteErrorKind};
use fluxpos_sync::usecase::drain::DrainOutbox;
use fluxpos_testing::fixture;

use crate::helpers::{MockOutboxRepo, MockRemoteBackend, RemoteCall, ScriptedProbe};

fn drain(
    outbox: &MockOutboxRepo,
    backend: &MockRemoteBackend,
    probe: ScriptedProbe,
) -> DrainOutbox<MockOutboxRepo, MockRemoteBackend, ScriptedProbe> {
    DrainOutbox {
        outbox: outbox.clone(),
        backend: backend.clone(),
        probe,
        permit: Arc::new(Semaphore::new(1)),
    }
}

#[tokio::test]
async fn should_deliver_pending_records_oldest_first() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let outbox = MockOutboxRepo::with_pending(vec![
        fixture::pending_record(
            2,
            EntityKind::Customers,
            OutboxAction::Insert,
            fixture::customer_row(second, "Beta"),
        ),
        fixture::pending_record(
            1,
            EntityKind::Suppliers,
            OutboxAction::Insert,
            fixture::supplier_row(first, "Alpha"),
        ),
    ]);
    let backend = MockRemoteBackend::new();

    let outcome = drain(&outbox, &backend, ScriptedProbe::online())
        .execute()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DrainOutcome::Completed(DrainReport {
            delivered: 2,
            failed: 0,
            deferred: 0,
        })
    );
    let calls = backend.mutation_calls();
    assert!(matches!(&calls[0], RemoteCall::Insert { table, .. } if table == "suppliers"));
    assert!(matches!(&calls[1], RemoteCall::Insert { table, .. } if table == "customers"));
}

#[tokio::test]
async fn should_short_circuit_when_offline() {
    let outbox = MockOutboxRepo::with_pending(vec![fixture::pending_record(
        1,
        EntityKind::Suppliers,
        OutboxAction::Insert,
        fixture::supplier_row(Uuid::new_v4(), "Alpha"),
    )]);
    let backend = MockRemoteBackend::new();

    let outcome = drain(&outbox, &backend, ScriptedProbe::offline())
        .execute()
        .await
        .unwrap();

    assert_eq!(outcome, DrainOutcome::Offline);
    assert!(backend.calls.lock().unwrap().is_empty());
    assert_eq!(outbox.counts().await.unwrap().pending, 1);
}

#[tokio::test]
async fn should_complete_quietly_on_empty_queue() {
    let outbox = MockOutboxRepo::new();
    let backend = MockRemoteBackend::new();

    let outcome = drain(&outbox, &backend, ScriptedProbe::online())
        .execute()
        .await
        .unwrap();

    assert_eq!(outcome, DrainOutcome::Completed(DrainReport::default()));
    assert!(backend.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_isolate_one_failed_record_and_keep_draining() {
    let good = Uuid::new_v4();
    let bad = Uuid::new_v4();
    let also_good = Uuid::new_v4();
    let records = vec![
        fixture::pending_record(
            1,
            EntityKind::Suppliers,
            OutboxAction::Insert,
            fixture::supplier_row(good, "Alpha"),
        ),
        fixture::pending_record(
            2,
            EntityKind::Suppliers,
            OutboxAction::Insert,
            fixture::supplier_row(bad, "Broken"),
        ),
        fixture::pending_record(
            3,
            EntityKind::Suppliers,
            OutboxAction::Insert,
            fixture::supplier_row(also_good, "Gamma"),
        ),
    ];
    let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
    let outbox = MockOutboxRepo::with_pending(records);
    let backend = MockRemoteBackend::new();
    backend.fail_id(bad, RemoteErrorKind::Validation);

    let outcome = drain(&outbox, &backend, ScriptedProbe::online())
        .execute()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DrainOutcome::Completed(DrainReport {
            delivered: 2,
            failed: 1,
            deferred: 0,
        })
    );
    assert_eq!(outbox.status_of(ids[0]), OutboxStatus::Synced);
    assert_eq!(outbox.status_of(ids[1]), OutboxStatus::Failed);
    assert_eq!(outbox.status_of(ids[2]), OutboxStatus::Synced);
    assert!(outbox.last_error_of(ids[1]).unwrap().contains("VALIDATION"));
}

#[tokio::test]
async fn should_treat_already_applied_as_delivered() {
    let replayed = Uuid::new_v4();
    let record = fixture::pending_record(
        1,
        EntityKind::Suppliers,
        OutboxAction::Insert,
        fixture::supplier_row(replayed, "Alpha"),
    );
    let record_id = record.id;
    let outbox = MockOutboxRepo::with_pending(vec![record]);
    let backend = MockRemoteBackend::new();
    backend.fail_id(replayed, RemoteErrorKind::AlreadyApplied);

    let outcome = drain(&outbox, &backend, ScriptedProbe::online())
        .execute()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DrainOutcome::Completed(DrainReport {
            delivered: 1,
            failed: 0,
            deferred: 0,
        })
    );
    assert_eq!(outbox.status_of(record_id), OutboxStatus::Synced);
}

#[tokio::test]
async fn should_leave_remainder_pending_when_connectivity_is_lost_mid_drain() {
    let records: Vec<_> = (1..=3)
        .map(|seq| {
            fixture::pending_record(
                seq,
                EntityKind::Suppliers,
                OutboxAction::Insert,
                fixture::supplier_row(Uuid::new_v4(), "S"),
            )
        })
        .collect();
    let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
    let outbox = MockOutboxRepo::with_pending(records);
    let backend = MockRemoteBackend::new();
    backend.offline_after(1);

    let outcome = drain(&outbox, &backend, ScriptedProbe::online())
        .execute()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DrainOutcome::Completed(DrainReport {
            delivered: 1,
            failed: 0,
            deferred: 2,
        })
    );
    assert_eq!(outbox.status_of(ids[0]), OutboxStatus::Synced);
    assert_eq!(outbox.status_of(ids[1]), OutboxStatus::Pending);
    assert_eq!(outbox.status_of(ids[2]), OutboxStatus::Pending);
    // The interrupted record was not marked failed and keeps its attempt
    // count at zero.
    assert_eq!(outbox.attempt_count_of(ids[1]), 0);
}

#[tokio::test]
async fn should_bump_attempt_count_on_every_delivery_attempt() {
    let bad = Uuid::new_v4();
    let record = fixture::pending_record(
        1,
        EntityKind::Suppliers,
        OutboxAction::Insert,
        fixture::supplier_row(bad, "Broken"),
    );
    let record_id = record.id;
    let outbox = MockOutboxRepo::with_pending(vec![record]);
    let backend = MockRemoteBackend::new();
    backend.fail_id(bad, RemoteErrorKind::Internal);

    drain(&outbox, &backend, ScriptedProbe::online())
        .execute()
        .await
        .unwrap();
    assert_eq!(outbox.attempt_count_of(record_id), 1);

    // Manual retry path: reset and drain again, still failing.
    outbox.reset_failed().await.unwrap();
    drain(&outbox, &backend, ScriptedProbe::online())
        .execute()
        .await
        .unwrap();
    assert_eq!(outbox.attempt_count_of(record_id), 2);
    assert_eq!(outbox.status_of(record_id), OutboxStatus::Failed);
}

#[tokio::test]
async fn should_collapse_into_an_in_flight_drain() {
    let outbox = MockOutboxRepo::with_pending(vec![fixture::pending_record(
        1,
        EntityKind::Suppliers,
        OutboxAction::Insert,
        fixture::supplier_row(Uuid::new_v4(), "Alpha"),
    )]);
    let backend = MockRemoteBackend::new();
    let usecase = drain(&outbox, &backend, ScriptedProbe::online());

    let held = usecase.permit.clone().try_acquire_owned().unwrap();
    let outcome = usecase.execute().await.unwrap();
    assert_eq!(outcome, DrainOutcome::AlreadyDraining);
    assert!(backend.calls.lock().unwrap().is_empty());
    drop(held);

    let outcome = usecase.execute().await.unwrap();
    assert!(matches!(outcome, DrainOutcome::Completed(_)));
}

#[tokio::test]
async fn should_route_stock_affecting_documents_through_procedures() {
    let grn_id = Uuid::new_v4();
    let invoice_id = Uuid::new_v4();
    let outbox = MockOutboxRepo::with_pending(vec![
        fixture::pending_record(
            1,
            EntityKind::SalesTransaction,
            OutboxAction::Insert,
            fixture::sale_payload(invoice_id, &[Uuid::new_v4()]),
        ),
        fixture::pending_record(
            2,
            EntityKind::Grns,
            OutboxAction::Update,
            json!({ "id": grn_id, "status": "posted" }),
        ),
    ]);
    let backend = MockRemoteBackend::new();

    drain(&outbox, &backend, ScriptedProbe::online())
        .execute()
        .await
        .unwrap();

    let calls = backend.mutation_calls();
    assert!(matches!(&calls[0], RemoteCall::Procedure { name, .. } if name == "post_sale"));
    match &calls[1] {
        RemoteCall::Procedure { name, args } => {
            assert_eq!(name, "post_grn");
            assert_eq!(args["grn_id"], json!(grn_id));
        }
        other => panic!("unexpected call: {other:?}"),
    }
}

#[tokio::test]
async fn should_fail_record_whose_payload_cannot_be_routed() {
    // An update without an id can never be delivered; it must not wedge
    // the queue.
    let broken = fixture::pending_record(
        1,
        EntityKind::Suppliers,
        OutboxAction::Update,
        json!({ "name": "no id" }),
    );
    let ok = fixture::pending_record(
        2,
        EntityKind::Suppliers,
        OutboxAction::Insert,
        fixture::supplier_row(Uuid::new_v4(), "Fine"),
    );
    let broken_id = broken.id;
    let ok_id = ok.id;
    let outbox = MockOutboxRepo::with_pending(vec![broken, ok]);
    let backend = MockRemoteBackend::new();

    let outcome = drain(&outbox, &backend, ScriptedProbe::online())
        .execute()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DrainOutcome::Completed(DrainReport {
            delivered: 1,
            failed: 1,
            deferred: 0,
        })
    );
    assert_eq!(outbox.status_of(broken_id), OutboxStatus::Failed);
    assert_eq!(outbox.status_of(ok_id), OutboxStatus::Synced);
}
