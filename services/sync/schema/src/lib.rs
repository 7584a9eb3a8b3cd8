//! sea-orm entities for the on-device local store.
//!
//! One module per table: the outbox plus every cached collection. Models
//! derive serde so reconciliation pulls can deserialize remote JSON rows
//! directly into them.

pub mod outbox_records;

pub mod categories;
pub mod customers;
pub mod grn_lines;
pub mod grns;
pub mod items;
pub mod locations;
pub mod purchase_order_lines;
pub mod purchase_orders;
pub mod sales_invoice_lines;
pub mod sales_invoices;
pub mod sales_return_lines;
pub mod sales_returns;
pub mod stock_balances;
pub mod stock_lots;
pub mod stock_transfer_lines;
pub mod stock_transfers;
pub mod suppliers;
pub mod units;
