use sea_orm_migration::prelude::*;

mod m20260810_000001_create_outbox_records;
mod m20260810_000002_create_catalog_tables;
mod m20260810_000003_create_partner_tables;
mod m20260810_000004_create_stock_tables;
mod m20260810_000005_create_sales_tables;
mod m20260810_000006_create_purchasing_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000001_create_outbox_records::Migration),
            Box::new(m20260810_000002_create_catalog_tables::Migration),
            Box::new(m20260810_000003_create_partner_tables::Migration),
            Box::new(m20260810_000004_create_stock_tables::Migration),
            Box::new(m20260810_000005_create_sales_tables::Migration),
            Box::new(m20260810_000006_create_purchasing_tables::Migration),
        ]
    }
}
