//! Reconcile: refresh every cached collection from the backend.
//!
//! The backend is the source of truth, with one carve-out: rows a pending
//! outbox record still refers to are shielded from overwrite, otherwise a
//! pull would revert local edits that have not been delivered yet.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::repository::{CacheRepository, OutboxRepository, RemoteBackend};
use crate::domain::types::{referenced_ids, Collection, ReconcileReport, RemoteErrorKind};
use crate::error::SyncServiceError;

pub struct ReconcileCaches<O, C, B> {
    pub outbox: O,
    pub cache: C,
    pub backend: B,
    pub location_id: Uuid,
    /// How many recent rows to pull for history collections.
    pub history_window: u64,
}

impl<O, C, B> ReconcileCaches<O, C, B>
where
    O: OutboxRepository,
    C: CacheRepository,
    B: RemoteBackend,
{
    pub async fn execute(&self) -> Result<ReconcileReport, SyncServiceError> {
        let shields = self.pending_shields().await?;
        let empty = HashSet::new();
        let mut report = ReconcileReport::default();

        for collection in Collection::ALL {
            let location = collection.location_scoped().then_some(self.location_id);
            let limit = collection
                .history_windowed()
                .then_some(self.history_window);

            let rows = match self.backend.fetch_all(collection.table(), location, limit).await {
                Ok(rows) => rows,
                Err(err) if err.kind == RemoteErrorKind::Connectivity => {
                    tracing::warn!(
                        collection = collection.table(),
                        "connectivity lost mid-reconcile",
                    );
                    report.skipped += Collection::ALL
                        .iter()
                        .skip_while(|c| **c != collection)
                        .count() as u64;
                    break;
                }
                // One bad collection never blocks the rest.
                Err(err) => {
                    tracing::warn!(
                        collection = collection.table(),
                        error = %err,
                        "collection pull failed, skipped",
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            let shield = shields.get(&collection).unwrap_or(&empty);
            let written = self
                .cache
                .replace_collection(collection, rows, shield)
                .await?;
            tracing::debug!(
                collection = collection.table(),
                rows = written,
                shielded = shield.len(),
                "collection refreshed",
            );
            report.refreshed += 1;
        }

        tracing::info!(
            refreshed = report.refreshed,
            skipped = report.skipped,
            "reconcile completed",
        );
        Ok(report)
    }

    /// Ids of cached rows still referenced by pending records, grouped by
    /// collection.
    async fn pending_shields(
        &self,
    ) -> Result<HashMap<Collection, HashSet<Uuid>>, SyncServiceError> {
        let mut shields: HashMap<Collection, HashSet<Uuid>> = HashMap::new();
        for record in self.outbox.list_pending().await? {
            for (collection, id) in referenced_ids(&record) {
                shields.entry(collection).or_default().insert(id);
            }
        }
        Ok(shields)
    }
}
