//! Engine wiring: one place that owns the usecases and runs the
//! trigger-driven scheduler loop.

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use uuid::Uuid;

use crate::domain::repository::{
    CacheRepository, ConnectivityProbe, OutboxRepository, RemoteBackend,
};
use crate::domain::types::{DrainOutcome, TriggerEvent};
use crate::trigger::TriggerHandle;
use crate::usecase::drain::DrainOutbox;
use crate::usecase::enqueue::EnqueueOutboxRecord;
use crate::usecase::reconcile::ReconcileCaches;
use crate::usecase::status::QueueStatus;

pub struct SyncEngine<O, C, B, P> {
    pub enqueue: EnqueueOutboxRecord<O>,
    pub drain: DrainOutbox<O, B, P>,
    pub reconcile: ReconcileCaches<O, C, B>,
    pub status: QueueStatus<O>,
}

impl<O, C, B, P> SyncEngine<O, C, B, P>
where
    O: OutboxRepository + Clone,
    C: CacheRepository,
    B: RemoteBackend + Clone,
    P: ConnectivityProbe,
{
    pub fn new(
        outbox: O,
        cache: C,
        backend: B,
        probe: P,
        trigger: TriggerHandle,
        location_id: Uuid,
        history_window: u64,
    ) -> Self {
        Self {
            enqueue: EnqueueOutboxRecord {
                outbox: outbox.clone(),
                trigger: trigger.clone(),
            },
            drain: DrainOutbox {
                outbox: outbox.clone(),
                backend: backend.clone(),
                probe,
                permit: Arc::new(Semaphore::new(1)),
            },
            reconcile: ReconcileCaches {
                outbox: outbox.clone(),
                cache,
                backend,
                location_id,
                history_window,
            },
            status: QueueStatus { outbox, trigger },
        }
    }

    /// Run one sync pass: drain, then reconcile if the drain actually ran.
    /// An offline or collapsed trigger reconciles nothing — caches only
    /// refresh behind a real delivery attempt.
    pub async fn sync(&self, event: TriggerEvent) -> Result<DrainOutcome, crate::error::SyncServiceError> {
        tracing::info!(trigger = event.as_str(), "sync pass started");
        let outcome = self.drain.execute().await?;
        if let DrainOutcome::Completed(_) = outcome {
            self.reconcile.execute().await?;
        }
        Ok(outcome)
    }

    /// Consume triggers until every handle is dropped. Errors are logged
    /// and the loop keeps going; a wedged store should not kill the
    /// scheduler.
    pub async fn run(&self, mut triggers: mpsc::Receiver<TriggerEvent>) {
        while let Some(event) = triggers.recv().await {
            if let Err(err) = self.sync(event).await {
                tracing::error!(error = %err, kind = err.kind(), "sync pass failed");
            }
        }
        tracing::info!("trigger channel closed, scheduler stopped");
    }
}
