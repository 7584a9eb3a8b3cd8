use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_return_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub location_id: Uuid,
    pub sales_return_id: Uuid,
    pub item_id: Uuid,
    pub lot_id: Option<Uuid>,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sales_returns::Entity",
        from = "Column::SalesReturnId",
        to = "super::sales_returns::Column::Id"
    )]
    SalesReturn,
}

impl Related<super::sales_returns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesReturn.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
