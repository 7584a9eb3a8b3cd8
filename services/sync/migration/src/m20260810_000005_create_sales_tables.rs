use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SalesInvoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalesInvoices::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SalesInvoices::LocationId).uuid().not_null())
                    .col(
                        ColumnDef::new(SalesInvoices::InvoiceNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesInvoices::InvoiceDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SalesInvoices::Subtotal).double().not_null())
                    .col(
                        ColumnDef::new(SalesInvoices::DiscountTotal)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SalesInvoices::GrandTotal)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesInvoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesInvoices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SalesInvoiceLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalesInvoiceLines::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SalesInvoiceLines::LocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesInvoiceLines::SalesInvoiceId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SalesInvoiceLines::ItemId).uuid().not_null())
                    .col(ColumnDef::new(SalesInvoiceLines::Qty).double().not_null())
                    .col(
                        ColumnDef::new(SalesInvoiceLines::UnitPrice)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesInvoiceLines::LineTotal)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesInvoiceLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesInvoiceLines::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SalesInvoiceLines::Table, SalesInvoiceLines::SalesInvoiceId)
                            .to(SalesInvoices::Table, SalesInvoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SalesReturns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalesReturns::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SalesReturns::LocationId).uuid().not_null())
                    .col(ColumnDef::new(SalesReturns::SalesInvoiceId).uuid())
                    .col(ColumnDef::new(SalesReturns::CustomerId).uuid())
                    .col(ColumnDef::new(SalesReturns::Status).string().not_null())
                    .col(
                        ColumnDef::new(SalesReturns::TotalAmount)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesReturns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesReturns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SalesReturnLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalesReturnLines::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SalesReturnLines::LocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesReturnLines::SalesReturnId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SalesReturnLines::ItemId).uuid().not_null())
                    .col(ColumnDef::new(SalesReturnLines::LotId).uuid())
                    .col(
                        ColumnDef::new(SalesReturnLines::Quantity)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesReturnLines::UnitPrice)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesReturnLines::LineTotal)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesReturnLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesReturnLines::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SalesReturnLines::Table, SalesReturnLines::SalesReturnId)
                            .to(SalesReturns::Table, SalesReturns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SalesReturnLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SalesReturns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SalesInvoiceLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SalesInvoices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SalesInvoices {
    Table,
    Id,
    LocationId,
    InvoiceNumber,
    InvoiceDate,
    Subtotal,
    DiscountTotal,
    GrandTotal,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SalesInvoiceLines {
    Table,
    Id,
    LocationId,
    SalesInvoiceId,
    ItemId,
    Qty,
    UnitPrice,
    LineTotal,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SalesReturns {
    Table,
    Id,
    LocationId,
    SalesInvoiceId,
    CustomerId,
    Status,
    TotalAmount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SalesReturnLines {
    Table,
    Id,
    LocationId,
    SalesReturnId,
    ItemId,
    LotId,
    Quantity,
    UnitPrice,
    LineTotal,
    CreatedAt,
    UpdatedAt,
}
