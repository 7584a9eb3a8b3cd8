//! Drain: deliver pending outbox records to the backend oldest-first.
//!
//! A single-permit semaphore keeps drains exclusive; triggers arriving
//! while one runs collapse into it. Each record fails or succeeds on its
//! own — only losing connectivity stops the pass, leaving the remainder
//! pending for the next trigger.

use std::sync::Arc;

use tokio::sync::Semaphore;

use fluxpos_domain::outbox::OutboxRecord;

use crate::domain::repository::{ConnectivityProbe, OutboxRepository, RemoteBackend};
use crate::domain::types::{DrainOutcome, DrainReport, RemoteError, RemoteErrorKind};
use crate::error::SyncServiceError;
use crate::router::{self, Route};

pub struct DrainOutbox<O, B, P> {
    pub outbox: O,
    pub backend: B,
    pub probe: P,
    pub permit: Arc<Semaphore>,
}

impl<O, B, P> DrainOutbox<O, B, P>
where
    O: OutboxRepository,
    B: RemoteBackend,
    P: ConnectivityProbe,
{
    pub async fn execute(&self) -> Result<DrainOutcome, SyncServiceError> {
        let Ok(_permit) = self.permit.try_acquire() else {
            tracing::debug!("drain already in flight");
            return Ok(DrainOutcome::AlreadyDraining);
        };

        if !self.probe.is_online().await {
            tracing::debug!("offline, drain skipped");
            return Ok(DrainOutcome::Offline);
        }

        let pending = self.outbox.list_pending().await?;
        let mut report = DrainReport::default();
        let total = pending.len();

        for (position, record) in pending.into_iter().enumerate() {
            match self.deliver(&record).await {
                Ok(()) => {
                    self.outbox.mark_synced(record.id).await?;
                    report.delivered += 1;
                }
                Err(DeliveryError::Remote(err)) if err.kind == RemoteErrorKind::Connectivity => {
                    // Everything behind this record stays pending too.
                    report.deferred = (total - position) as u64;
                    tracing::warn!(
                        id = %record.id,
                        deferred = report.deferred,
                        "connectivity lost mid-drain",
                    );
                    break;
                }
                Err(err) => {
                    let message = err.to_string();
                    tracing::warn!(
                        id = %record.id,
                        entity = %record.entity,
                        error = %message,
                        "outbox record failed",
                    );
                    self.outbox.mark_failed(record.id, &message).await?;
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            delivered = report.delivered,
            failed = report.failed,
            deferred = report.deferred,
            "drain completed",
        );
        Ok(DrainOutcome::Completed(report))
    }

    async fn deliver(&self, record: &OutboxRecord) -> Result<(), DeliveryError> {
        let result = match router::for_record(record)? {
            Route::Insert { table } => self.backend.insert(table, &record.payload).await,
            Route::Update { table, id } => self.backend.update(table, id, &record.payload).await,
            Route::Delete { table, id } => self.backend.delete(table, id).await,
            Route::Procedure { name, args } => self.backend.call_procedure(name, &args).await,
        };

        match result {
            Ok(()) => Ok(()),
            // The backend has this state already; redelivery succeeded.
            Err(err) if err.kind == RemoteErrorKind::AlreadyApplied => {
                tracing::debug!(id = %record.id, "already applied remotely");
                Ok(())
            }
            Err(err) => Err(DeliveryError::Remote(err)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum DeliveryError {
    #[error("{0}")]
    Route(#[from] SyncServiceError),
    #[error("{}: {}", .0.kind.code(), .0.message)]
    Remote(#[from] RemoteError),
}
