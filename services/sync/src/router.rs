//! Maps an outbox record to the remote operation that delivers it.
//!
//! Most entities map straight onto table CRUD. Documents with server-side
//! stock effects (sales, goods receipts, approvals, transfers, returns) go
//! through named procedures so the backend applies the whole state change
//! atomically.

use serde_json::json;
use uuid::Uuid;

use fluxpos_domain::entity::EntityKind;
use fluxpos_domain::outbox::{OutboxAction, OutboxRecord};

use crate::error::SyncServiceError;

/// How one record reaches the backend. Routes that target a single row
/// carry the id already parsed, so the id requirement is enforced here and
/// nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Insert {
        table: &'static str,
    },
    Update {
        table: &'static str,
        id: Uuid,
    },
    Delete {
        table: &'static str,
        id: Uuid,
    },
    /// A server-side procedure invoked with a JSON argument object.
    Procedure {
        name: &'static str,
        args: serde_json::Value,
    },
}

/// Payload `id`, required for updates, deletes, and id-carrying procedures.
fn payload_id(record: &OutboxRecord) -> Result<Uuid, SyncServiceError> {
    record
        .payload
        .get("id")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .ok_or(SyncServiceError::PayloadMissingId)
}

fn payload_status(record: &OutboxRecord) -> Option<&str> {
    record.payload.get("status").and_then(|s| s.as_str())
}

fn unsupported(record: &OutboxRecord) -> SyncServiceError {
    SyncServiceError::UnsupportedAction {
        entity: record.entity,
        action: record.action,
    }
}

fn direct(record: &OutboxRecord, table: &'static str) -> Result<Route, SyncServiceError> {
    Ok(match record.action {
        OutboxAction::Insert => Route::Insert { table },
        OutboxAction::Update => Route::Update {
            table,
            id: payload_id(record)?,
        },
        OutboxAction::Delete => Route::Delete {
            table,
            id: payload_id(record)?,
        },
    })
}

/// Resolve the route for a record. Fails only on combinations the client
/// never produces, so a routing error marks the record failed rather than
/// wedging the queue.
pub fn for_record(record: &OutboxRecord) -> Result<Route, SyncServiceError> {
    match record.entity {
        // Composite sale: header + lines posted in one atomic call.
        EntityKind::SalesTransaction => match record.action {
            OutboxAction::Insert => Ok(Route::Procedure {
                name: "post_sale",
                args: json!({ "payload": record.payload }),
            }),
            _ => Err(unsupported(record)),
        },

        // A receipt moving to `posted` applies stock server-side. Draft
        // edits before that stay plain CRUD.
        EntityKind::Grns => match (record.action, payload_status(record)) {
            (OutboxAction::Insert | OutboxAction::Update, Some("posted")) => {
                Ok(Route::Procedure {
                    name: "post_grn",
                    args: json!({ "grn_id": payload_id(record)? }),
                })
            }
            _ => direct(record, "grns"),
        },

        EntityKind::PurchaseOrders => match (record.action, payload_status(record)) {
            (OutboxAction::Update, Some("approved")) => Ok(Route::Procedure {
                name: "approve_purchase_order",
                args: json!({ "po_id": payload_id(record)? }),
            }),
            _ => direct(record, "purchase_orders"),
        },

        EntityKind::StockTransfers => match (record.action, payload_status(record)) {
            (OutboxAction::Insert | OutboxAction::Update, Some("in_transit")) => {
                Ok(Route::Procedure {
                    name: "dispatch_transfer",
                    args: json!({ "transfer_id": payload_id(record)? }),
                })
            }
            (OutboxAction::Update, Some("completed")) => Ok(Route::Procedure {
                name: "receive_transfer",
                args: json!({ "transfer_id": payload_id(record)? }),
            }),
            _ => direct(record, "stock_transfers"),
        },

        EntityKind::SalesReturns => match record.action {
            OutboxAction::Insert => Ok(Route::Procedure {
                name: "post_sales_return",
                args: json!({ "payload": record.payload }),
            }),
            _ => Err(unsupported(record)),
        },

        // Everything else is plain table CRUD.
        kind => direct(record, kind.as_str()),
    }
}
