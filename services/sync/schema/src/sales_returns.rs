use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sales return header, posted remotely via `post_sales_return`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_returns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub location_id: Uuid,
    pub sales_invoice_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub status: String,
    pub total_amount: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
