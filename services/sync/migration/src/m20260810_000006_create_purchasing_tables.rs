use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Grns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Grns::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Grns::LocationId).uuid().not_null())
                    .col(ColumnDef::new(Grns::SupplierId).uuid())
                    .col(ColumnDef::new(Grns::Status).string().not_null())
                    .col(ColumnDef::new(Grns::ReferenceNumber).string())
                    .col(ColumnDef::new(Grns::ReceivedDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Grns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Grns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GrnLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GrnLines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(GrnLines::LocationId).uuid().not_null())
                    .col(ColumnDef::new(GrnLines::GrnId).uuid().not_null())
                    .col(ColumnDef::new(GrnLines::ItemId).uuid().not_null())
                    .col(ColumnDef::new(GrnLines::LotId).uuid())
                    .col(ColumnDef::new(GrnLines::Quantity).double().not_null())
                    .col(ColumnDef::new(GrnLines::Cost).double().not_null())
                    .col(
                        ColumnDef::new(GrnLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GrnLines::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GrnLines::Table, GrnLines::GrnId)
                            .to(Grns::Table, Grns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrders::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::LocationId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrders::SupplierId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrders::Status).string().not_null())
                    .col(ColumnDef::new(PurchaseOrders::OrderNumber).string())
                    .col(
                        ColumnDef::new(PurchaseOrders::ExpectedDate)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrderLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrderLines::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrderLines::LocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrderLines::PurchaseOrderId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrderLines::ItemId).uuid().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrderLines::Quantity)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrderLines::Cost).double().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrderLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrderLines::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                PurchaseOrderLines::Table,
                                PurchaseOrderLines::PurchaseOrderId,
                            )
                            .to(PurchaseOrders::Table, PurchaseOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StockTransfers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockTransfers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockTransfers::LocationId).uuid().not_null())
                    .col(
                        ColumnDef::new(StockTransfers::SourceLocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockTransfers::TargetLocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockTransfers::Status).string().not_null())
                    .col(
                        ColumnDef::new(StockTransfers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockTransfers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StockTransferLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockTransferLines::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StockTransferLines::LocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockTransferLines::StockTransferId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockTransferLines::ItemId).uuid().not_null())
                    .col(ColumnDef::new(StockTransferLines::LotId).uuid())
                    .col(
                        ColumnDef::new(StockTransferLines::Quantity)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockTransferLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StockTransferLines::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                StockTransferLines::Table,
                                StockTransferLines::StockTransferId,
                            )
                            .to(StockTransfers::Table, StockTransfers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StockTransferLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StockTransfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseOrderLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GrnLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grns::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Grns {
    Table,
    Id,
    LocationId,
    SupplierId,
    Status,
    ReferenceNumber,
    ReceivedDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum GrnLines {
    Table,
    Id,
    LocationId,
    GrnId,
    ItemId,
    LotId,
    Quantity,
    Cost,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PurchaseOrders {
    Table,
    Id,
    LocationId,
    SupplierId,
    Status,
    OrderNumber,
    ExpectedDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PurchaseOrderLines {
    Table,
    Id,
    LocationId,
    PurchaseOrderId,
    ItemId,
    Quantity,
    Cost,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StockTransfers {
    Table,
    Id,
    LocationId,
    SourceLocationId,
    TargetLocationId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StockTransferLines {
    Table,
    Id,
    LocationId,
    StockTransferId,
    ItemId,
    LotId,
    Quantity,
    CreatedAt,
    UpdatedAt,
}
