//! Queue visibility and the failed-record escape hatch.

use fluxpos_domain::outbox::OutboxCounts;

use crate::domain::repository::OutboxRepository;
use crate::domain::types::TriggerEvent;
use crate::error::SyncServiceError;
use crate::trigger::TriggerHandle;

pub struct QueueStatus<O> {
    pub outbox: O,
    pub trigger: TriggerHandle,
}

impl<O> QueueStatus<O>
where
    O: OutboxRepository,
{
    pub async fn counts(&self) -> Result<OutboxCounts, SyncServiceError> {
        Ok(self.outbox.counts().await?)
    }

    /// Move every failed record back to pending and request a drain.
    /// Payloads replay verbatim; the status flips and the stored delivery
    /// error clears.
    pub async fn retry_failed(&self) -> Result<u64, SyncServiceError> {
        let moved = self.outbox.reset_failed().await?;
        if moved > 0 {
            tracing::info!(moved, "failed records reset to pending");
            self.trigger.request(TriggerEvent::Manual);
        }
        Ok(moved)
    }
}
