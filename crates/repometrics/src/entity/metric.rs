//! Metric entity - a generic `(name, value)` measurement attached to a file.
//!
//! Keeping measurements as rows means a new analyzer output can be stored
//! without a schema change.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub file_id: Uuid,
    pub metric_name: String,
    #[sea_orm(column_type = "Double")]
    pub metric_value: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::source_file::Entity",
        from = "Column::FileId",
        to = "super::source_file::Column::Id",
        on_delete = "Cascade"
    )]
    File,
}

impl Related<super::source_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::File.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
