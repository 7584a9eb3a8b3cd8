//! Fixture builders for sync tests.
//!
//! Rows are built from the typed shapes in `fluxpos_domain::retail` and
//! serialized, so a fixture can never drift from the cached row layout.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use fluxpos_domain::entity::EntityKind;
use fluxpos_domain::outbox::{NewOutboxRecord, OutboxAction, OutboxRecord, OutboxStatus};
use fluxpos_domain::retail::{Customer, SaleDocument, SalesInvoice, SalesInvoiceLine, Supplier};

/// Deterministic test timestamp, `offset_secs` after a fixed epoch.
pub fn at(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(offset_secs)
}

/// The fixed location every fixture belongs to.
pub fn location_id() -> Uuid {
    Uuid::from_u128(0x51_0c_a7_10)
}

/// A pending record with a deterministic `(created_at, seq)` position.
pub fn pending_record(
    seq: i64,
    entity: EntityKind,
    action: OutboxAction,
    payload: serde_json::Value,
) -> OutboxRecord {
    OutboxRecord {
        id: Uuid::new_v4(),
        entity,
        action,
        location_id: location_id(),
        payload,
        status: OutboxStatus::Pending,
        created_at: at(seq),
        seq,
        attempt_count: 0,
        last_error: None,
    }
}

/// Enqueue input for a supplier insert.
pub fn new_supplier_record(name: &str) -> NewOutboxRecord {
    NewOutboxRecord {
        entity: EntityKind::Suppliers,
        action: OutboxAction::Insert,
        location_id: location_id(),
        payload: supplier_row(Uuid::new_v4(), name),
    }
}

pub fn supplier_row(id: Uuid, name: &str) -> serde_json::Value {
    to_row(&Supplier {
        id,
        location_id: location_id(),
        name: name.to_owned(),
        supplier_no: None,
        contact_info: None,
        credit_days: Some(30),
        created_at: at(0),
        updated_at: at(0),
    })
}

pub fn customer_row(id: Uuid, name: &str) -> serde_json::Value {
    to_row(&Customer {
        id,
        location_id: location_id(),
        name: name.to_owned(),
        mobile: None,
        email: None,
        credit_limit: None,
        credit_days: None,
        created_at: at(0),
        updated_at: at(0),
    })
}

/// Composite sale payload: invoice header plus its lines, as posted by the
/// point of sale.
pub fn sale_payload(invoice_id: Uuid, line_ids: &[Uuid]) -> serde_json::Value {
    let document = SaleDocument {
        invoice: SalesInvoice {
            id: invoice_id,
            location_id: location_id(),
            invoice_number: "INV-0001".to_owned(),
            invoice_date: at(0),
            subtotal: 100.0,
            discount_total: 0.0,
            grand_total: 105.0,
            created_at: at(0),
            updated_at: at(0),
        },
        lines: line_ids
            .iter()
            .map(|id| SalesInvoiceLine {
                id: *id,
                location_id: location_id(),
                sales_invoice_id: invoice_id,
                item_id: Uuid::new_v4(),
                qty: 1.0,
                unit_price: 100.0,
                line_total: 105.0,
                created_at: at(0),
                updated_at: at(0),
            })
            .collect(),
    };
    to_row(&document)
}

fn to_row<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| panic!("fixture did not serialize: {e}"))
}
