use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One durable intent to replay a local mutation against the remote
/// backend. The dispatcher mutates only `status`, `attempt_count` and
/// `last_error`; rows are never deleted by the engine.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "outbox_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entity: String,
    pub action: String,
    pub location_id: Uuid,
    pub payload: Json,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Monotonic local sequence assigned at enqueue; breaks created_at ties
    /// so delivery order never depends on wall-clock resolution.
    #[sea_orm(unique)]
    pub seq: i64,
    pub attempt_count: i32,
    pub last_error: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
