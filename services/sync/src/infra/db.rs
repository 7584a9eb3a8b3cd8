use std::collections::HashSet;

use anyhow::Context as _;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use fluxpos_domain::outbox::{OutboxCounts, OutboxRecord, OutboxStatus};
use fluxpos_sync_schema::{
    categories, customers, grn_lines, grns, items, locations, outbox_records,
    purchase_order_lines, purchase_orders, sales_invoice_lines, sales_invoices,
    sales_return_lines, sales_returns, stock_balances, stock_lots, stock_transfer_lines,
    stock_transfers, suppliers, units,
};

use crate::domain::repository::{CacheRepository, OutboxRepository};
use crate::domain::types::{CacheOp, Collection};

// ── Outbox repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOutboxRepository {
    pub db: DatabaseConnection,
}

impl OutboxRepository for DbOutboxRepository {
    async fn enqueue(&self, record: &OutboxRecord, cache: &[CacheOp]) -> Result<i64, anyhow::Error> {
        let record = record.clone();
        let cache = cache.to_vec();
        let seq = self
            .db
            .transaction::<_, i64, DbErr>(|txn| {
                Box::pin(async move {
                    let seq = next_seq(txn).await?;
                    insert_outbox_record(txn, &record, seq).await?;
                    for op in &cache {
                        apply_cache_op(txn, op).await?;
                    }
                    Ok(seq)
                })
            })
            .await
            .context("enqueue outbox record")?;
        Ok(seq)
    }

    async fn list_pending(&self) -> Result<Vec<OutboxRecord>, anyhow::Error> {
        let models = outbox_records::Entity::find()
            .filter(outbox_records::Column::Status.eq(OutboxStatus::Pending.as_str()))
            .order_by_asc(outbox_records::Column::CreatedAt)
            .order_by_asc(outbox_records::Column::Seq)
            .all(&self.db)
            .await
            .context("list pending outbox records")?;
        models.into_iter().map(record_from_model).collect()
    }

    async fn mark_synced(&self, id: Uuid) -> Result<(), anyhow::Error> {
        outbox_records::Entity::update_many()
            .col_expr(
                outbox_records::Column::Status,
                Expr::value(OutboxStatus::Synced.as_str()),
            )
            .col_expr(
                outbox_records::Column::AttemptCount,
                Expr::col(outbox_records::Column::AttemptCount).add(1),
            )
            .col_expr(
                outbox_records::Column::LastError,
                Expr::value(Option::<String>::None),
            )
            .filter(outbox_records::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("mark outbox record synced")?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, message: &str) -> Result<(), anyhow::Error> {
        outbox_records::Entity::update_many()
            .col_expr(
                outbox_records::Column::Status,
                Expr::value(OutboxStatus::Failed.as_str()),
            )
            .col_expr(
                outbox_records::Column::AttemptCount,
                Expr::col(outbox_records::Column::AttemptCount).add(1),
            )
            .col_expr(outbox_records::Column::LastError, Expr::value(message))
            .filter(outbox_records::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("mark outbox record failed")?;
        Ok(())
    }

    async fn reset_failed(&self) -> Result<u64, anyhow::Error> {
        let result = outbox_records::Entity::update_many()
            .col_expr(
                outbox_records::Column::Status,
                Expr::value(OutboxStatus::Pending.as_str()),
            )
            .col_expr(
                outbox_records::Column::LastError,
                Expr::value(Option::<String>::None),
            )
            .filter(outbox_records::Column::Status.eq(OutboxStatus::Failed.as_str()))
            .exec(&self.db)
            .await
            .context("reset failed outbox records")?;
        Ok(result.rows_affected)
    }

    async fn counts(&self) -> Result<OutboxCounts, anyhow::Error> {
        let mut counts = OutboxCounts::default();
        for (status, slot) in [
            (OutboxStatus::Pending, &mut counts.pending),
            (OutboxStatus::Synced, &mut counts.synced),
            (OutboxStatus::Failed, &mut counts.failed),
        ] {
            *slot = outbox_records::Entity::find()
                .filter(outbox_records::Column::Status.eq(status.as_str()))
                .count(&self.db)
                .await
                .context("count outbox records")?;
        }
        Ok(counts)
    }
}

/// Next value of the monotonic enqueue sequence. Runs inside the enqueue
/// transaction, so two enqueues cannot observe the same maximum.
async fn next_seq(txn: &DatabaseTransaction) -> Result<i64, DbErr> {
    let last = outbox_records::Entity::find()
        .order_by_desc(outbox_records::Column::Seq)
        .one(txn)
        .await?;
    Ok(last.map(|m| m.seq + 1).unwrap_or(1))
}

async fn insert_outbox_record(
    txn: &DatabaseTransaction,
    record: &OutboxRecord,
    seq: i64,
) -> Result<(), DbErr> {
    outbox_records::ActiveModel {
        id: Set(record.id),
        entity: Set(record.entity.as_str().to_owned()),
        action: Set(record.action.as_str().to_owned()),
        location_id: Set(record.location_id),
        payload: Set(record.payload.clone()),
        status: Set(record.status.as_str().to_owned()),
        created_at: Set(record.created_at),
        seq: Set(seq),
        attempt_count: Set(record.attempt_count),
        last_error: Set(record.last_error.clone()),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn record_from_model(model: outbox_records::Model) -> Result<OutboxRecord, anyhow::Error> {
    Ok(OutboxRecord {
        id: model.id,
        entity: model.entity.parse().map_err(anyhow::Error::msg)?,
        action: model.action.parse().map_err(anyhow::Error::msg)?,
        location_id: model.location_id,
        payload: model.payload,
        status: model.status.parse().map_err(anyhow::Error::msg)?,
        created_at: model.created_at,
        seq: model.seq,
        attempt_count: model.attempt_count,
        last_error: model.last_error,
    })
}

// ── Cache repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCacheRepository {
    pub db: DatabaseConnection,
}

impl CacheRepository for DbCacheRepository {
    async fn replace_collection(
        &self,
        collection: Collection,
        rows: Vec<serde_json::Value>,
        shield: &HashSet<Uuid>,
    ) -> Result<u64, anyhow::Error> {
        let shield = shield.clone();
        let written = self
            .db
            .transaction::<_, u64, DbErr>(move |txn| {
                Box::pin(async move { refresh_collection(txn, collection, rows, &shield).await })
            })
            .await
            .context("replace cached collection")?;
        Ok(written)
    }
}

async fn refresh_collection(
    txn: &DatabaseTransaction,
    collection: Collection,
    rows: Vec<serde_json::Value>,
    shield: &HashSet<Uuid>,
) -> Result<u64, DbErr> {
    match collection {
        Collection::Locations => {
            refresh_rows::<locations::Entity, _>(txn, locations::Column::Id, rows, shield).await
        }
        Collection::Categories => {
            refresh_rows::<categories::Entity, _>(txn, categories::Column::Id, rows, shield).await
        }
        Collection::Units => {
            refresh_rows::<units::Entity, _>(txn, units::Column::Id, rows, shield).await
        }
        Collection::Items => {
            refresh_rows::<items::Entity, _>(txn, items::Column::Id, rows, shield).await
        }
        Collection::Suppliers => {
            refresh_rows::<suppliers::Entity, _>(txn, suppliers::Column::Id, rows, shield).await
        }
        Collection::Customers => {
            refresh_rows::<customers::Entity, _>(txn, customers::Column::Id, rows, shield).await
        }
        Collection::StockLots => {
            refresh_rows::<stock_lots::Entity, _>(txn, stock_lots::Column::Id, rows, shield).await
        }
        Collection::StockBalances => {
            refresh_rows::<stock_balances::Entity, _>(
                txn,
                stock_balances::Column::Id,
                rows,
                shield,
            )
            .await
        }
        Collection::SalesInvoices => {
            refresh_rows::<sales_invoices::Entity, _>(
                txn,
                sales_invoices::Column::Id,
                rows,
                shield,
            )
            .await
        }
        Collection::SalesInvoiceLines => {
            refresh_rows::<sales_invoice_lines::Entity, _>(
                txn,
                sales_invoice_lines::Column::Id,
                rows,
                shield,
            )
            .await
        }
        Collection::Grns => {
            refresh_rows::<grns::Entity, _>(txn, grns::Column::Id, rows, shield).await
        }
        Collection::GrnLines => {
            refresh_rows::<grn_lines::Entity, _>(txn, grn_lines::Column::Id, rows, shield).await
        }
        Collection::PurchaseOrders => {
            refresh_rows::<purchase_orders::Entity, _>(
                txn,
                purchase_orders::Column::Id,
                rows,
                shield,
            )
            .await
        }
        Collection::PurchaseOrderLines => {
            refresh_rows::<purchase_order_lines::Entity, _>(
                txn,
                purchase_order_lines::Column::Id,
                rows,
                shield,
            )
            .await
        }
        Collection::StockTransfers => {
            refresh_rows::<stock_transfers::Entity, _>(
                txn,
                stock_transfers::Column::Id,
                rows,
                shield,
            )
            .await
        }
        Collection::StockTransferLines => {
            refresh_rows::<stock_transfer_lines::Entity, _>(
                txn,
                stock_transfer_lines::Column::Id,
                rows,
                shield,
            )
            .await
        }
        Collection::SalesReturns => {
            refresh_rows::<sales_returns::Entity, _>(txn, sales_returns::Column::Id, rows, shield)
                .await
        }
        Collection::SalesReturnLines => {
            refresh_rows::<sales_return_lines::Entity, _>(
                txn,
                sales_return_lines::Column::Id,
                rows,
                shield,
            )
            .await
        }
    }
}

/// Replace a table's rows with the pulled set, leaving shielded ids alone.
/// Rows that do not deserialize into the local model are skipped, so one
/// drifted remote column cannot abort a refresh.
async fn refresh_rows<E, A>(
    txn: &DatabaseTransaction,
    id_col: E::Column,
    rows: Vec<serde_json::Value>,
    shield: &HashSet<Uuid>,
) -> Result<u64, DbErr>
where
    E: EntityTrait,
    E::Model: serde::de::DeserializeOwned + IntoActiveModel<A>,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    E::delete_many()
        .filter(id_col.is_not_in(shield.iter().copied()))
        .exec(txn)
        .await?;

    let mut written = 0u64;
    for row in rows {
        if row_id(&row).is_some_and(|id| shield.contains(&id)) {
            continue;
        }
        let model: E::Model = match serde_json::from_value(row) {
            Ok(model) => model,
            Err(err) => {
                tracing::warn!(error = %err, "pulled row does not fit local schema, skipped");
                continue;
            }
        };
        model.into_active_model().reset_all().insert(txn).await?;
        written += 1;
    }
    Ok(written)
}

fn row_id(row: &serde_json::Value) -> Option<Uuid> {
    row.get("id")?.as_str()?.parse().ok()
}

async fn apply_cache_op(txn: &DatabaseTransaction, op: &CacheOp) -> Result<(), DbErr> {
    match op {
        CacheOp::Upsert { collection, row } => {
            let Some(id) = row_id(row) else {
                return Err(DbErr::Custom("cache upsert row has no id".to_owned()));
            };
            delete_cached_row(txn, *collection, id).await?;
            insert_cached_row(txn, *collection, row.clone()).await
        }
        CacheOp::Delete { collection, id } => delete_cached_row(txn, *collection, *id).await,
    }
}

async fn insert_cached_row(
    txn: &DatabaseTransaction,
    collection: Collection,
    row: serde_json::Value,
) -> Result<(), DbErr> {
    async fn insert_as<E, A>(txn: &DatabaseTransaction, row: serde_json::Value) -> Result<(), DbErr>
    where
        E: EntityTrait,
        E::Model: serde::de::DeserializeOwned + IntoActiveModel<A>,
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    {
        let model: E::Model = serde_json::from_value(row)
            .map_err(|err| DbErr::Custom(format!("cache row does not fit local schema: {err}")))?;
        model.into_active_model().reset_all().insert(txn).await?;
        Ok(())
    }

    match collection {
        Collection::Locations => insert_as::<locations::Entity, _>(txn, row).await,
        Collection::Categories => insert_as::<categories::Entity, _>(txn, row).await,
        Collection::Units => insert_as::<units::Entity, _>(txn, row).await,
        Collection::Items => insert_as::<items::Entity, _>(txn, row).await,
        Collection::Suppliers => insert_as::<suppliers::Entity, _>(txn, row).await,
        Collection::Customers => insert_as::<customers::Entity, _>(txn, row).await,
        Collection::StockLots => insert_as::<stock_lots::Entity, _>(txn, row).await,
        Collection::StockBalances => insert_as::<stock_balances::Entity, _>(txn, row).await,
        Collection::SalesInvoices => insert_as::<sales_invoices::Entity, _>(txn, row).await,
        Collection::SalesInvoiceLines => {
            insert_as::<sales_invoice_lines::Entity, _>(txn, row).await
        }
        Collection::Grns => insert_as::<grns::Entity, _>(txn, row).await,
        Collection::GrnLines => insert_as::<grn_lines::Entity, _>(txn, row).await,
        Collection::PurchaseOrders => insert_as::<purchase_orders::Entity, _>(txn, row).await,
        Collection::PurchaseOrderLines => {
            insert_as::<purchase_order_lines::Entity, _>(txn, row).await
        }
        Collection::StockTransfers => insert_as::<stock_transfers::Entity, _>(txn, row).await,
        Collection::StockTransferLines => {
            insert_as::<stock_transfer_lines::Entity, _>(txn, row).await
        }
        Collection::SalesReturns => insert_as::<sales_returns::Entity, _>(txn, row).await,
        Collection::SalesReturnLines => insert_as::<sales_return_lines::Entity, _>(txn, row).await,
    }
}

async fn delete_cached_row(
    txn: &DatabaseTransaction,
    collection: Collection,
    id: Uuid,
) -> Result<(), DbErr> {
    async fn delete_as<E>(txn: &DatabaseTransaction, id_col: E::Column, id: Uuid) -> Result<(), DbErr>
    where
        E: EntityTrait,
    {
        E::delete_many().filter(id_col.eq(id)).exec(txn).await?;
        Ok(())
    }

    match collection {
        Collection::Locations => delete_as::<locations::Entity>(txn, locations::Column::Id, id).await,
        Collection::Categories => {
            delete_as::<categories::Entity>(txn, categories::Column::Id, id).await
        }
        Collection::Units => delete_as::<units::Entity>(txn, units::Column::Id, id).await,
        Collection::Items => delete_as::<items::Entity>(txn, items::Column::Id, id).await,
        Collection::Suppliers => {
            delete_as::<suppliers::Entity>(txn, suppliers::Column::Id, id).await
        }
        Collection::Customers => {
            delete_as::<customers::Entity>(txn, customers::Column::Id, id).await
        }
        Collection::StockLots => {
            delete_as::<stock_lots::Entity>(txn, stock_lots::Column::Id, id).await
        }
        Collection::StockBalances => {
            delete_as::<stock_balances::Entity>(txn, stock_balances::Column::Id, id).await
        }
        Collection::SalesInvoices => {
            delete_as::<sales_invoices::Entity>(txn, sales_invoices::Column::Id, id).await
        }
        Collection::SalesInvoiceLines => {
            delete_as::<sales_invoice_lines::Entity>(txn, sales_invoice_lines::Column::Id, id).await
        }
        Collection::Grns => delete_as::<grns::Entity>(txn, grns::Column::Id, id).await,
        Collection::GrnLines => delete_as::<grn_lines::Entity>(txn, grn_lines::Column::Id, id).await,
        Collection::PurchaseOrders => {
            delete_as::<purchase_orders::Entity>(txn, purchase_orders::Column::Id, id).await
        }
        Collection::PurchaseOrderLines => {
            delete_as::<purchase_order_lines::Entity>(txn, purchase_order_lines::Column::Id, id)
                .await
        }
        Collection::StockTransfers => {
            delete_as::<stock_transfers::Entity>(txn, stock_transfers::Column::Id, id).await
        }
        Collection::StockTransferLines => {
            delete_as::<stock_transfer_lines::Entity>(txn, stock_transfer_lines::Column::Id, id)
                .await
        }
        Collection::SalesReturns => {
            delete_as::<sales_returns::Entity>(txn, sales_returns::Column::Id, id).await
        }
        Collection::SalesReturnLines => {
            delete_as::<sales_return_lines::Entity>(txn, sales_return_lines::Column::Id, id).await
        }
    }
}
