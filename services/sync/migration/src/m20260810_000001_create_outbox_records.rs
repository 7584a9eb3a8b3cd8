use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OutboxRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OutboxRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OutboxRecords::Entity).string().not_null())
                    .col(ColumnDef::new(OutboxRecords::Action).string().not_null())
                    .col(ColumnDef::new(OutboxRecords::LocationId).uuid().not_null())
                    .col(ColumnDef::new(OutboxRecords::Payload).json().not_null())
                    .col(ColumnDef::new(OutboxRecords::Status).string().not_null())
                    .col(
                        ColumnDef::new(OutboxRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OutboxRecords::Seq)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(OutboxRecords::AttemptCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(OutboxRecords::LastError).string())
                    .to_owned(),
            )
            .await?;

        // Index for the dispatcher's pending scan (status, then delivery order).
        manager
            .create_index(
                Index::create()
                    .table(OutboxRecords::Table)
                    .col(OutboxRecords::Status)
                    .col(OutboxRecords::CreatedAt)
                    .col(OutboxRecords::Seq)
                    .name("idx_outbox_records_status_created_at_seq")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OutboxRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OutboxRecords {
    Table,
    Id,
    Entity,
    Action,
    LocationId,
    Payload,
    Status,
    CreatedAt,
    Seq,
    AttemptCount,
    LastError,
}
