//! Enqueue: durably record an intent, optimistically update the local
//! cache, and nudge the dispatcher.

use chrono::Utc;
use uuid::Uuid;

use fluxpos_domain::entity::EntityKind;
use fluxpos_domain::outbox::{NewOutboxRecord, OutboxAction, OutboxRecord, OutboxStatus};

use crate::domain::repository::OutboxRepository;
use crate::domain::types::{collection_of, CacheOp, Collection, TriggerEvent};
use crate::error::SyncServiceError;
use crate::router;
use crate::trigger::TriggerHandle;

pub struct EnqueueOutboxRecord<O> {
    pub outbox: O,
    pub trigger: TriggerHandle,
}

impl<O> EnqueueOutboxRecord<O>
where
    O: OutboxRepository,
{
    /// Stamp, validate, and persist a record together with its cache
    /// writes, then request a drain. Returns the stored record with its
    /// assigned sequence number.
    pub async fn execute(&self, new: NewOutboxRecord) -> Result<OutboxRecord, SyncServiceError> {
        let mut record = OutboxRecord {
            id: Uuid::new_v4(),
            entity: new.entity,
            action: new.action,
            location_id: new.location_id,
            payload: new.payload,
            status: OutboxStatus::Pending,
            created_at: Utc::now(),
            seq: 0,
            attempt_count: 0,
            last_error: None,
        };

        // Reject records no route exists for before they are durable.
        router::for_record(&record)?;

        let cache = cache_ops(&record)?;
        record.seq = self.outbox.enqueue(&record, &cache).await?;

        tracing::info!(
            id = %record.id,
            entity = %record.entity,
            action = %record.action,
            seq = record.seq,
            "outbox record enqueued",
        );
        self.trigger.request(TriggerEvent::Enqueued);
        Ok(record)
    }
}

/// Optimistic cache writes mirroring the record, applied in the enqueue
/// transaction. A sale expands into its invoice header plus lines.
fn cache_ops(record: &OutboxRecord) -> Result<Vec<CacheOp>, SyncServiceError> {
    if record.entity == EntityKind::SalesTransaction {
        let mut ops = Vec::new();
        if let Some(invoice) = record.payload.get("invoice") {
            ops.push(CacheOp::Upsert {
                collection: Collection::SalesInvoices,
                row: invoice.clone(),
            });
        }
        if let Some(lines) = record.payload.get("lines").and_then(|l| l.as_array()) {
            ops.extend(lines.iter().map(|line| CacheOp::Upsert {
                collection: Collection::SalesInvoiceLines,
                row: line.clone(),
            }));
        }
        return Ok(ops);
    }

    let Some(collection) = collection_of(record.entity) else {
        return Ok(Vec::new());
    };
    match record.action {
        OutboxAction::Insert | OutboxAction::Update => Ok(vec![CacheOp::Upsert {
            collection,
            row: record.payload.clone(),
        }]),
        OutboxAction::Delete => {
            let id = record
                .payload
                .get("id")
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse().ok())
                .ok_or(SyncServiceError::PayloadMissingId)?;
            Ok(vec![CacheOp::Delete { collection, id }])
        }
    }
}
