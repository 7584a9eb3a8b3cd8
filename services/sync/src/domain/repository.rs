//! Ports the sync engine depends on. Infra provides the real
//! implementations; tests substitute in-memory ones.

use std::collections::HashSet;

use uuid::Uuid;

use fluxpos_domain::outbox::{OutboxCounts, OutboxRecord};

use crate::domain::types::{CacheOp, Collection, RemoteError};

/// Durable outbox storage.
pub trait OutboxRepository {
    /// Persist a record and its optimistic cache writes in one transaction.
    /// Returns the monotonic sequence number stamped on the record.
    async fn enqueue(
        &self,
        record: &OutboxRecord,
        cache: &[CacheOp],
    ) -> Result<i64, anyhow::Error>;

    /// Pending records ordered by `(created_at, seq)` ascending.
    async fn list_pending(&self) -> Result<Vec<OutboxRecord>, anyhow::Error>;

    /// Mark one record delivered and bump its attempt count.
    async fn mark_synced(&self, id: Uuid) -> Result<(), anyhow::Error>;

    /// Mark one record failed with the delivery error, bumping its attempt
    /// count.
    async fn mark_failed(&self, id: Uuid, message: &str) -> Result<(), anyhow::Error>;

    /// Flip every failed record back to pending, clearing the stored
    /// delivery error. Returns how many moved.
    async fn reset_failed(&self) -> Result<u64, anyhow::Error>;

    async fn counts(&self) -> Result<OutboxCounts, anyhow::Error>;
}

/// Local read-cache storage, written only by enqueue (through
/// [`OutboxRepository::enqueue`]) and by reconciliation.
pub trait CacheRepository {
    /// Replace a collection's rows with the pulled set, leaving rows whose
    /// ids appear in `shield` untouched. Returns how many rows were
    /// written.
    async fn replace_collection(
        &self,
        collection: Collection,
        rows: Vec<serde_json::Value>,
        shield: &HashSet<Uuid>,
    ) -> Result<u64, anyhow::Error>;
}

/// The remote backend a record is delivered to.
pub trait RemoteBackend {
    async fn insert(&self, table: &str, row: &serde_json::Value) -> Result<(), RemoteError>;

    async fn update(
        &self,
        table: &str,
        id: Uuid,
        row: &serde_json::Value,
    ) -> Result<(), RemoteError>;

    async fn delete(&self, table: &str, id: Uuid) -> Result<(), RemoteError>;

    /// Invoke a named server-side procedure with a JSON argument object.
    async fn call_procedure(
        &self,
        name: &str,
        args: &serde_json::Value,
    ) -> Result<(), RemoteError>;

    /// Pull rows for reconciliation, optionally filtered by location and
    /// bounded to the most recent `limit` rows.
    async fn fetch_all(
        &self,
        table: &str,
        location_id: Option<Uuid>,
        limit: Option<u64>,
    ) -> Result<Vec<serde_json::Value>, RemoteError>;
}

/// Cheap connectivity check consulted before any remote work.
pub trait ConnectivityProbe {
    async fn is_online(&self) -> bool;
}
