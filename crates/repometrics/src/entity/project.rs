//! Project entity - aggregate metrics of one analyzed checkout.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project model - one-to-one with a repository.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning repository. Unique: a repository has a single project.
    #[sea_orm(unique)]
    pub repository_id: Uuid,
    /// Filesystem path that was analyzed.
    pub path: String,
    pub total_files: i32,
    pub total_lines_of_code: i64,
    #[sea_orm(column_type = "Double")]
    pub avg_cyclomatic_complexity: f64,
    /// When the project was first analyzed.
    pub created_at: DateTimeWithTimeZone,
    /// When the aggregates were last refreshed.
    pub analyzed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repository::Entity",
        from = "Column::RepositoryId",
        to = "super::repository::Column::Id",
        on_delete = "Cascade"
    )]
    Repository,
    #[sea_orm(has_many = "super::directory::Entity")]
    Directories,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl Related<super::directory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Directories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
