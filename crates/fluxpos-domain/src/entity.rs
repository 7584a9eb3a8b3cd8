//! The closed set of entities a local mutation can target.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logical name of the aggregate an outbox record mutates.
///
/// Wire format: the remote table name in snake_case, except
/// `SalesTransaction` which is a purely local name for the composite
/// invoice-plus-lines document the POS enqueues as one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Categories,
    Units,
    Items,
    Suppliers,
    Customers,
    StockLots,
    StockBalances,
    SalesTransaction,
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

/// All entity kinds, in no particular order.
pub const ALL_ENTITY_KINDS: [EntityKind; 18] = [
    EntityKind::Categories,
    EntityKind::Units,
    EntityKind::Items,
    EntityKind::Suppliers,
    EntityKind::Customers,
    EntityKind::StockLots,
    EntityKind::StockBalances,
    EntityKind::SalesTransaction,
    EntityKind::SalesInvoices,
    EntityKind::SalesInvoiceLines,
    EntityKind::Grns,
    EntityKind::GrnLines,
    EntityKind::PurchaseOrders,
    EntityKind::PurchaseOrderLines,
    EntityKind::StockTransfers,
    EntityKind::StockTransferLines,
    EntityKind::SalesReturns,
    EntityKind::SalesReturnLines,
];

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Units => "units",
            Self::Items => "items",
            Self::Suppliers => "suppliers",
            Self::Customers => "customers",
            Self::StockLots => "stock_lots",
            Self::StockBalances => "stock_balances",
            Self::SalesTransaction => "sales_transaction",
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
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown entity name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity kind: {0}")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_ENTITY_KINDS
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEntityKind(s.to_owned()))
    }
}
