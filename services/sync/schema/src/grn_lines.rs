use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grn_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub location_id: Uuid,
    pub grn_id: Uuid,
    pub item_id: Uuid,
    pub lot_id: Option<Uuid>,
    pub quantity: f64,
    pub cost: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grns::Entity",
        from = "Column::GrnId",
        to = "super::grns::Column::Id"
    )]
    Grn,
}

impl Related<super::grns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grn.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
