use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StockLots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockLots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockLots::LocationId).uuid().not_null())
                    .col(ColumnDef::new(StockLots::ItemId).uuid().not_null())
                    .col(ColumnDef::new(StockLots::BatchNumber).string())
                    .col(ColumnDef::new(StockLots::ExpiryDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(StockLots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockLots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Lot resolution during GRN entry is by (item, batch).
        manager
            .create_index(
                Index::create()
                    .table(StockLots::Table)
                    .col(StockLots::ItemId)
                    .col(StockLots::BatchNumber)
                    .name("idx_stock_lots_item_id_batch_number")
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StockBalances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockBalances::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockBalances::LocationId).uuid().not_null())
                    .col(ColumnDef::new(StockBalances::ItemId).uuid().not_null())
                    .col(ColumnDef::new(StockBalances::LotId).uuid())
                    .col(
                        ColumnDef::new(StockBalances::QuantityOnHand)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StockBalances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockBalances::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(StockBalances::Table)
                    .col(StockBalances::LocationId)
                    .col(StockBalances::ItemId)
                    .name("idx_stock_balances_location_id_item_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StockBalances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StockLots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum StockLots {
    Table,
    Id,
    LocationId,
    ItemId,
    BatchNumber,
    ExpiryDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StockBalances {
    Table,
    Id,
    LocationId,
    ItemId,
    LotId,
    QuantityOnHand,
    CreatedAt,
    UpdatedAt,
}
