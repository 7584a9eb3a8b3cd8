//! Engine-local types: cached collections, remote errors, drain reporting,
//! trigger events, and the optimistic cache writes paired with an enqueue.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fluxpos_domain::entity::EntityKind;
use fluxpos_domain::outbox::OutboxRecord;

// ── Cached collections ───────────────────────────────────────────────────────

/// A local cache table owned by the reconciler for writes.
///
/// Distinct from [`EntityKind`]: `locations` is cached but never enqueued,
/// and `sales_transaction` is an enqueued composite that is not itself a
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Locations,
    Categories,
    Units,
    Items,
    Suppliers,
    Customers,
    StockLots,
    StockBalances,
    SalesInvoices,
    SalesInvoiceLines,
    Grns,
    GrnLines,
    PurchaseOrders,
    PurchaseOrderLines,
    StockTransfers,
    StockTransferLines,
    SalesReturns,
    SalesReturnLines,
}

impl Collection {
    pub const ALL: [Collection; 18] = [
        Collection::Locations,
        Collection::Categories,
        Collection::Units,
        Collection::Items,
        Collection::Suppliers,
        Collection::Customers,
        Collection::StockLots,
        Collection::StockBalances,
        Collection::SalesInvoices,
        Collection::SalesInvoiceLines,
        Collection::Grns,
        Collection::GrnLines,
        Collection::PurchaseOrders,
        Collection::PurchaseOrderLines,
        Collection::StockTransfers,
        Collection::StockTransferLines,
        Collection::SalesReturns,
        Collection::SalesReturnLines,
    ];

    /// Remote (and local) table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::Locations => "locations",
            Self::Categories => "categories",
            Self::Units => "units",
            Self::Items => "items",
            Self::Suppliers => "suppliers",
            Self::Customers => "customers",
            Self::StockLots => "stock_lots",
            Self::StockBalances => "stock_balances",
            Self::SalesInvoices => "sales_invoices",
            Self::SalesInvoiceLines => "sales_invoice_lines",
            Self::Grns => "grns",
            Self::GrnLines => "grn_lines",
            Self::PurchaseOrders => "purchase_orders",
            Self::PurchaseOrderLines => "purchase_order_lines",
            Self::StockTransfers => "stock_transfers",
            Self::StockTransferLines => "stock_transfer_lines",
            Self::SalesReturns => "sales_returns",
            Self::SalesReturnLines => "sales_return_lines",
        }
    }

    /// Whether reconciliation pulls filter by the device's location.
    /// `locations` is the one global collection.
    pub fn location_scoped(self) -> bool {
        !matches!(self, Self::Locations)
    }

    /// Transactional history collections are pulled as a bounded recent
    /// window instead of a full refresh.
    pub fn history_windowed(self) -> bool {
        matches!(
            self,
            Self::SalesInvoices
                | Self::SalesInvoiceLines
                | Self::Grns
                | Self::GrnLines
                | Self::SalesReturns
                | Self::SalesReturnLines
        )
    }
}

/// The cache table an enqueued entity kind writes through to, if any.
pub fn collection_of(kind: EntityKind) -> Option<Collection> {
    match kind {
        EntityKind::Categories => Some(Collection::Categories),
        EntityKind::Units => Some(Collection::Units),
        EntityKind::Items => Some(Collection::Items),
        EntityKind::Suppliers => Some(Collection::Suppliers),
        EntityKind::Customers => Some(Collection::Customers),
        EntityKind::StockLots => Some(Collection::StockLots),
        EntityKind::StockBalances => Some(Collection::StockBalances),
        EntityKind::SalesInvoices => Some(Collection::SalesInvoices),
        EntityKind::SalesInvoiceLines => Some(Collection::SalesInvoiceLines),
        EntityKind::Grns => Some(Collection::Grns),
        EntityKind::GrnLines => Some(Collection::GrnLines),
        EntityKind::PurchaseOrders => Some(Collection::PurchaseOrders),
        EntityKind::PurchaseOrderLines => Some(Collection::PurchaseOrderLines),
        EntityKind::StockTransfers => Some(Collection::StockTransfers),
        EntityKind::StockTransferLines => Some(Collection::StockTransferLines),
        EntityKind::SalesReturns => Some(Collection::SalesReturns),
        EntityKind::SalesReturnLines => Some(Collection::SalesReturnLines),
        // Composite; its cached rows are the invoice + lines it carries.
        EntityKind::SalesTransaction => None,
    }
}

/// Cached rows a still-pending record refers to. The reconciler shields
/// these ids from wholesale overwrite so a pull cannot clobber local edits
/// that have not reached the server yet.
pub fn referenced_ids(record: &OutboxRecord) -> Vec<(Collection, Uuid)> {
    fn id_of(value: &serde_json::Value) -> Option<Uuid> {
        value.get("id")?.as_str()?.parse().ok()
    }

    match record.entity {
        EntityKind::SalesTransaction => {
            let mut refs = Vec::new();
            if let Some(invoice) = record.payload.get("invoice")
                && let Some(id) = id_of(invoice)
            {
                refs.push((Collection::SalesInvoices, id));
            }
            if let Some(lines) = record.payload.get("lines").and_then(|l| l.as_array()) {
                refs.extend(
                    lines
                        .iter()
                        .filter_map(id_of)
                        .map(|id| (Collection::SalesInvoiceLines, id)),
                );
            }
            refs
        }
        kind => collection_of(kind)
            .zip(id_of(&record.payload))
            .into_iter()
            .collect(),
    }
}

// ── Optimistic cache writes ──────────────────────────────────────────────────

/// Local cache mutation applied in the same transaction as an enqueue, so
/// read views reflect the change immediately while the record is pending.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheOp {
    Upsert {
        collection: Collection,
        row: serde_json::Value,
    },
    Delete {
        collection: Collection,
        id: Uuid,
    },
}

// ── Remote errors ────────────────────────────────────────────────────────────

/// Structured error code returned by the remote backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// No network path to the backend; the record stays pending.
    Connectivity,
    /// The backend rejected the record's content.
    Validation,
    /// The target aggregate is already in the requested terminal state.
    /// Treated as success — this is what makes redelivery safe.
    AlreadyApplied,
    /// Backend-side fault.
    Internal,
}

impl RemoteErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::Connectivity => "CONNECTIVITY",
            Self::Validation => "VALIDATION",
            Self::AlreadyApplied => "ALREADY_APPLIED",
            Self::Internal => "INTERNAL",
        }
    }

    /// Parse the `kind` field of a remote error body. Unknown codes map to
    /// `Internal` so a backend rollout of new codes cannot crash a device.
    pub fn from_code(code: &str) -> Self {
        match code {
            "CONNECTIVITY" => Self::Connectivity,
            "VALIDATION" => Self::Validation,
            "ALREADY_APPLIED" => Self::AlreadyApplied,
            _ => Self::Internal,
        }
    }
}

/// Error from one remote call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Connectivity,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn already_applied(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::AlreadyApplied,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Internal,
            message: message.into(),
        }
    }
}

// ── Drain reporting ──────────────────────────────────────────────────────────

/// Outcome of one dispatcher invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The drain ran to completion (possibly stopping early on lost
    /// connectivity).
    Completed(DrainReport),
    /// The device was offline; nothing happened.
    Offline,
    /// Another drain was already in flight; this trigger collapsed into it.
    AlreadyDraining,
}

/// Per-drain accounting. `deferred` counts records left pending because
/// connectivity was lost mid-drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    pub delivered: u64,
    pub failed: u64,
    pub deferred: u64,
}

// ── Triggers ─────────────────────────────────────────────────────────────────

/// Why a drain was requested. All variants converge on the same entry
/// point; the drain permit collapses concurrent triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    Startup,
    Online,
    Enqueued,
    Manual,
}

impl TriggerEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Online => "online",
            Self::Enqueued => "enqueued",
            Self::Manual => "manual",
        }
    }
}

/// Per-collection reconciliation accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub refreshed: u64,
    pub skipped: u64,
}
