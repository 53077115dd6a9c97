//! ProjectMetric entity - project-level multimetric figures (flat schema).
//!
//! Columns mirror the `overall` object printed by `multimetric`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Name of the project directory. Natural key.
    #[sea_orm(unique)]
    pub project_name: String,

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

    /// When the figures were last written.
    pub analyzed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::file_code_metric::Entity")]
    Files,
}

impl Related<super::file_code_metric::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
