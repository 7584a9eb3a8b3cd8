//! Cached retail row shapes.
//!
//! Field names are snake_case and match the remote tables column for
//! column, so a row serializes straight into a Direct-strategy payload and
//! a reconciliation pull deserializes straight into the local cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A store branch. Cached for offline reads, never enqueued from a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub location_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: Uuid,
    pub location_id: Uuid,
    pub name: String,
    pub short_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub location_id: Uuid,
    pub category_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub name: String,
    pub barcode: Option<String>,
    pub sale_price: f64,
    pub cost: f64,
    pub is_batch_tracked: bool,
    pub expiry_warning_days: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub location_id: Uuid,
    pub name: String,
    pub supplier_no: Option<String>,
    pub contact_info: Option<String>,
    pub credit_days: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub location_id: Uuid,
    pub name: String,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub credit_limit: Option<f64>,
    pub credit_days: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A batch of a batch-tracked item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLot {
    pub id: Uuid,
    pub location_id: Uuid,
    pub item_id: Uuid,
    pub batch_number: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// On-hand quantity per item (and lot, when batch-tracked).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBalance {
    pub id: Uuid,
    pub location_id: Uuid,
    pub item_id: Uuid,
    pub lot_id: Option<Uuid>,
    pub quantity_on_hand: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesInvoice {
    pub id: Uuid,
    pub location_id: Uuid,
    pub invoice_number: String,
    pub invoice_date: DateTime<Utc>,
    pub subtotal: f64,
    pub discount_total: f64,
    pub grand_total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesInvoiceLine {
    pub id: Uuid,
    pub location_id: Uuid,
    pub sales_invoice_id: Uuid,
    pub item_id: Uuid,
    pub qty: f64,
    pub unit_price: f64,
    pub line_total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The composite document a completed sale enqueues as a single record.
/// Delivered whole to the `post_sale` remote procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDocument {
    pub invoice: SalesInvoice,
    pub lines: Vec<SalesInvoiceLine>,
}

/// Goods-received note header. `status` is `draft` until posted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grn {
    pub id: Uuid,
    pub location_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub status: String,
    pub reference_number: Option<String>,
    pub received_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrnLine {
    pub id: Uuid,
    pub location_id: Uuid,
    pub grn_id: Uuid,
    pub item_id: Uuid,
    pub lot_id: Option<Uuid>,
    pub quantity: f64,
    pub cost: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Purchase order header. `status`: draft | approved | received | closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub location_id: Uuid,
    pub supplier_id: Uuid,
    pub status: String,
    pub order_number: Option<String>,
    pub expected_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    pub id: Uuid,
    pub location_id: Uuid,
    pub purchase_order_id: Uuid,
    pub item_id: Uuid,
    pub quantity: f64,
    pub cost: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stock transfer header. `status`: pending | in_transit | completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTransfer {
    pub id: Uuid,
    pub location_id: Uuid,
    pub source_location_id: Uuid,
    pub target_location_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTransferLine {
    pub id: Uuid,
    pub location_id: Uuid,
    pub stock_transfer_id: Uuid,
    pub item_id: Uuid,
    pub lot_id: Option<Uuid>,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sales return header. Delivered whole (with its lines) to
/// `post_sales_return`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReturn {
    pub id: Uuid,
    pub location_id: Uuid,
    pub sales_invoice_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub status: String,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReturnLine {
    pub id: Uuid,
    pub location_id: Uuid,
    pub sales_return_id: Uuid,
    pub item_id: Uuid,
    pub lot_id: Option<Uuid>,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
