//! FileCodeMetric entity - per-file multimetric figures (flat schema).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file_code_metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    /// Path of the staged copy that multimetric analyzed.
    pub file_path: String,

    #[sea_orm(column_type = "Double")]
    pub comment_ratio: f64,
    pub cyclomatic_complexity: i64,
    pub fanout_external: i64,
    pub fanout_internal: i64,

    // ─── Halstead ────────────────────────────────────────────────────────────
    #[sea_orm(column_type = "Double")]
    pub halstead_bugprop: f64,
    #[sea_orm(column_type = "Double")]
    pub halstead_difficulty: f64,
    #[sea_orm(column_type = "Double")]
    pub halstead_effort: f64,
    #[sea_orm(column_type = "Double")]
    pub halstead_timerequired: f64,
    #[sea_orm(column_type = "Double")]
    pub halstead_volume: f64,

    pub programming_lang: String,
    pub lines_of_code: i64,
    #[sea_orm(column_type = "Double")]
    pub maintainability_index: f64,

    // ─── Operands / operators ────────────────────────────────────────────────
    pub operands_sum: i64,
    pub operands_uniq: i64,
    pub operators_sum: i64,
    pub operators_uniq: i64,

    // ─── TIOBE quality indicator ─────────────────────────────────────────────
    #[sea_orm(column_type = "Double")]
    pub tiobe: f64,
    #[sea_orm(column_type = "Double")]
    pub tiobe_compiler: f64,
    #[sea_orm(column_type = "Double")]
    pub tiobe_complexity: f64,
    #[sea_orm(column_type = "Double")]
    pub tiobe_coverage: f64,
    #[sea_orm(column_type = "Double")]
    pub tiobe_duplication: f64,
    #[sea_orm(column_type = "Double")]
    pub tiobe_fanout: f64,
    #[sea_orm(column_type = "Double")]
    pub tiobe_functional: f64,
    #[sea_orm(column_type = "Double")]
    pub tiobe_security: f64,
    #[sea_orm(column_type = "Double")]
    pub tiobe_standard: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project_metric::Entity",
        from = "Column::ProjectId",
        to = "super::project_metric::Column::Id",
        on_delete = "Cascade"
    )]
    Project,
}

impl Related<super::project_metric::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
