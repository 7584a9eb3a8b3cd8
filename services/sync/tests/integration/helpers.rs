use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use fluxpos_domain::outbox::{OutboxCounts, OutboxRecord, OutboxStatus};
use fluxpos_sync::domain::repository::{
    CacheRepository, ConnectivityProbe, OutboxRepository, RemoteBackend,
};
use fluxpos_sync::domain::types::{CacheOp, Collection, RemoteError, RemoteErrorKind};

// ── MockOutboxRepo ───────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockOutboxRepo {
    pub records: Arc<Mutex<Vec<OutboxRecord>>>,
    pub cache_ops: Arc<Mutex<Vec<CacheOp>>>,
}

impl MockOutboxRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pending(records: Vec<OutboxRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            cache_ops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn status_of(&self, id: Uuid) -> OutboxStatus {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status)
            .unwrap()
    }

    pub fn attempt_count_of(&self, id: Uuid) -> i32 {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.attempt_count)
            .unwrap()
    }

    pub fn last_error_of(&self, id: Uuid) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .and_then(|r| r.last_error.clone())
    }
}

impl OutboxRepository for MockOutboxRepo {
    async fn enqueue(&self, record: &OutboxRecord, cache: &[CacheOp]) -> Result<i64, anyhow::Error> {
        let mut records = self.records.lock().unwrap();
        let seq = records.iter().map(|r| r.seq).max().unwrap_or(0) + 1;
        let mut record = record.clone();
        record.seq = seq;
        records.push(record);
        self.cache_ops.lock().unwrap().extend_from_slice(cache);
        Ok(seq)
    }

    async fn list_pending(&self) -> Result<Vec<OutboxRecord>, anyhow::Error> {
        let mut pending: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == OutboxStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|r| (r.created_at, r.seq));
        Ok(pending)
    }

    async fn mark_synced(&self, id: Uuid) -> Result<(), anyhow::Error> {
        let mut records = self.records.lock().unwrap();
        let record = records.iter_mut().find(|r| r.id == id).unwrap();
        record.status = OutboxStatus::Synced;
        record.attempt_count += 1;
        record.last_error = None;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, message: &str) -> Result<(), anyhow::Error> {
        let mut records = self.records.lock().unwrap();
        let record = records.iter_mut().find(|r| r.id == id).unwrap();
        record.status = OutboxStatus::Failed;
        record.attempt_count += 1;
        record.last_error = Some(message.to_owned());
        Ok(())
    }

    async fn reset_failed(&self) -> Result<u64, anyhow::Error> {
        let mut moved = 0;
        for record in self.records.lock().unwrap().iter_mut() {
            if record.status == OutboxStatus::Failed {
                record.status = OutboxStatus::Pending;
                record.last_error = None;
                moved += 1;
            }
        }
        Ok(moved)
    }

    async fn counts(&self) -> Result<OutboxCounts, anyhow::Error> {
        let records = self.records.lock().unwrap();
        let of = |status| records.iter().filter(|r| r.status == status).count() as u64;
        Ok(OutboxCounts {
            pending: of(OutboxStatus::Pending),
            synced: of(OutboxStatus::Synced),
            failed: of(OutboxStatus::Failed),
        })
    }
}

// ── MockCacheRepo ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceCall {
    pub collection: Collection,
    pub rows: Vec<serde_json::Value>,
    pub shield: HashSet<Uuid>,
}

#[derive(Clone, Default)]
pub struct MockCacheRepo {
    pub replaces: Arc<Mutex<Vec<ReplaceCall>>>,
}

impl MockCacheRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_for(&self, collection: Collection) -> Option<ReplaceCall> {
        self.replaces
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.collection == collection)
            .cloned()
    }
}

impl CacheRepository for MockCacheRepo {
    async fn replace_collection(
        &self,
        collection: Collection,
        rows: Vec<serde_json::Value>,
        shield: &HashSet<Uuid>,
    ) -> Result<u64, anyhow::Error> {
        let written = rows.len() as u64;
        self.replaces.lock().unwrap().push(ReplaceCall {
            collection,
            rows,
            shield: shield.clone(),
        });
        Ok(written)
    }
}

// ── MockRemoteBackend ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Insert { table: String, row: serde_json::Value },
    Update { table: String, id: Uuid },
    Delete { table: String, id: Uuid },
    Procedure { name: String, args: serde_json::Value },
    Fetch { table: String, location_id: Option<Uuid>, limit: Option<u64> },
}

#[derive(Clone, Default)]
pub struct MockRemoteBackend {
    pub calls: Arc<Mutex<Vec<RemoteCall>>>,
    fail_ids: Arc<Mutex<HashMap<Uuid, RemoteErrorKind>>>,
    fetch_rows: Arc<Mutex<HashMap<String, Vec<serde_json::Value>>>>,
    fetch_failures: Arc<Mutex<HashMap<String, RemoteErrorKind>>>,
    deliveries_before_offline: Arc<Mutex<Option<usize>>>,
}

impl MockRemoteBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any delivery touching `id` fails with `kind`.
    pub fn fail_id(&self, id: Uuid, kind: RemoteErrorKind) {
        self.fail_ids.lock().unwrap().insert(id, kind);
    }

    /// After `n` successful deliveries, every remote call loses
    /// connectivity.
    pub fn offline_after(&self, n: usize) {
        *self.deliveries_before_offline.lock().unwrap() = Some(n);
    }

    pub fn set_rows(&self, table: &str, rows: Vec<serde_json::Value>) {
        self.fetch_rows.lock().unwrap().insert(table.to_owned(), rows);
    }

    pub fn fail_table(&self, table: &str, kind: RemoteErrorKind) {
        self.fetch_failures
            .lock()
            .unwrap()
            .insert(table.to_owned(), kind);
    }

    pub fn mutation_calls(&self) -> Vec<RemoteCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| !matches!(c, RemoteCall::Fetch { .. }))
            .cloned()
            .collect()
    }

    fn scripted(&self, id: Option<Uuid>) -> Result<(), RemoteError> {
        let mut budget = self.deliveries_before_offline.lock().unwrap();
        if let Some(remaining) = budget.as_mut() {
            if *remaining == 0 {
                return Err(RemoteError::connectivity("connection reset"));
            }
            *remaining -= 1;
        }
        if let Some(id) = id
            && let Some(kind) = self.fail_ids.lock().unwrap().get(&id)
        {
            return Err(RemoteError {
                kind: *kind,
                message: format!("scripted failure for {id}"),
            });
        }
        Ok(())
    }
}

fn json_id(value: &serde_json::Value) -> Option<Uuid> {
    value.get("id")?.as_str()?.parse().ok()
}

/// Dig the target aggregate id out of a procedure argument object.
fn procedure_id(args: &serde_json::Value) -> Option<Uuid> {
    for key in ["grn_id", "po_id", "transfer_id"] {
        if let Some(id) = args.get(key).and_then(|v| v.as_str()).and_then(|s| s.parse().ok()) {
            return Some(id);
        }
    }
    let payload = args.get("payload")?;
    payload
        .get("invoice")
        .and_then(json_id)
        .or_else(|| json_id(payload))
}

impl RemoteBackend for MockRemoteBackend {
    async fn insert(&self, table: &str, row: &serde_json::Value) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(RemoteCall::Insert {
            table: table.to_owned(),
            row: row.clone(),
        });
        self.scripted(json_id(row))
    }

    async fn update(
        &self,
        table: &str,
        id: Uuid,
        _row: &serde_json::Value,
    ) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(RemoteCall::Update {
            table: table.to_owned(),
            id,
        });
        self.scripted(Some(id))
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(RemoteCall::Delete {
            table: table.to_owned(),
            id,
        });
        self.scripted(Some(id))
    }

    async fn call_procedure(&self, name: &str, args: &serde_json::Value) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(RemoteCall::Procedure {
            name: name.to_owned(),
            args: args.clone(),
        });
        self.scripted(procedure_id(args))
    }

    async fn fetch_all(
        &self,
        table: &str,
        location_id: Option<Uuid>,
        limit: Option<u64>,
    ) -> Result<Vec<serde_json::Value>, RemoteError> {
        self.calls.lock().unwrap().push(RemoteCall::Fetch {
            table: table.to_owned(),
            location_id,
            limit,
        });
        if let Some(remaining) = *self.deliveries_before_offline.lock().unwrap()
            && remaining == 0
        {
            return Err(RemoteError::connectivity("connection reset"));
        }
        if let Some(kind) = self.fetch_failures.lock().unwrap().get(table) {
            return Err(RemoteError {
                kind: *kind,
                message: format!("scripted pull failure for {table}"),
            });
        }
        Ok(self
            .fetch_rows
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default())
    }
}

// ── ScriptedProbe ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ScriptedProbe {
    online: Arc<Mutex<bool>>,
}

impl ScriptedProbe {
    pub fn online() -> Self {
        Self {
            online: Arc::new(Mutex::new(true)),
        }
    }

    pub fn offline() -> Self {
        Self {
            online: Arc::new(Mutex::new(false)),
        }
    }
}

impl ConnectivityProbe for ScriptedProbe {
    async fn is_online(&self) -> bool {
        *self.online.lock().unwrap()
    }
}
