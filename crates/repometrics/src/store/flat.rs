//! Rows of the flat multimetric schema.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::file_code_metric::{
    ActiveModel as FileActiveModel, Column as FileColumn, Entity as FileCodeMetric,
    Model as FileModel,
};
use crate::entity::project_metric::{
    ActiveModel as ProjectActiveModel, Column as ProjectColumn, Entity as ProjectMetric,
    Model as ProjectModel,
};
use crate::flat::MetricValues;

use super::errors::Result;

/// Insert or update the project-level row keyed by `project_name`.
pub async fn upsert_project_metric<C: ConnectionTrait>(
    conn: &C,
    project_name: &str,
    values: &MetricValues,
) -> Result<ProjectModel> {
    let existing = ProjectMetric::find()
        .filter(ProjectColumn::ProjectName.eq(project_name))
        .one(conn)
        .await?;

    let id = existing.as_ref().map_or_else(Uuid::new_v4, |m| m.id);
    let model = ProjectActiveModel {
        id: Set(id),
        project_name: Set(project_name.to_string()),
        comment_ratio: Set(values.comment_ratio),
        cyclomatic_complexity: Set(values.cyclomatic_complexity),
        fanout_external: Set(values.fanout_external),
        fanout_internal: Set(values.fanout_internal),
        halstead_bugprop: Set(values.halstead_bugprop),
        halstead_difficulty: Set(values.halstead_difficulty),
        halstead_effort: Set(values.halstead_effort),
        halstead_timerequired: Set(values.halstead_timerequired),
        halstead_volume: Set(values.halstead_volume),
        programming_lang: Set(values.programming_lang.clone()),
        lines_of_code: Set(values.lines_of_code),
        maintainability_index: Set(values.maintainability_index),
        operands_sum: Set(values.operands_sum),
        operands_uniq: Set(values.operands_uniq),
        operators_sum: Set(values.operators_sum),
        operators_uniq: Set(values.operators_uniq),
        tiobe: Set(values.tiobe),
        tiobe_compiler: Set(values.tiobe_compiler),
        tiobe_complexity: Set(values.tiobe_complexity),
        tiobe_coverage: Set(values.tiobe_coverage),
        tiobe_duplication: Set(values.tiobe_duplication),
        tiobe_fanout: Set(values.tiobe_fanout),
        tiobe_functional: Set(values.tiobe_functional),
        tiobe_security: Set(values.tiobe_security),
        tiobe_standard: Set(values.tiobe_standard),
        analyzed_at: Set(Utc::now().fixed_offset()),
    };

    if existing.is_some() {
        Ok(model.update(conn).await?)
    } else {
        Ok(model.insert(conn).await?)
    }
}

/// Replace all per-file rows of a flat project.
///
/// Returns the number of rows inserted.
pub async fn replace_file_metrics<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
    files: &[(String, MetricValues)],
) -> Result<usize> {
    FileCodeMetric::delete_many()
        .filter(FileColumn::ProjectId.eq(project_id))
        .exec(conn)
        .await?;

    if files.is_empty() {
        return Ok(0);
    }

    let rows = files
        .iter()
        .map(|(path, values)| file_model(project_id, path, values));
    FileCodeMetric::insert_many(rows).exec(conn).await?;

    Ok(files.len())
}

/// List the per-file rows of a flat project by path.
pub async fn list_file_metrics<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
) -> Result<Vec<FileModel>> {
    Ok(FileCodeMetric::find()
        .filter(FileColumn::ProjectId.eq(project_id))
        .order_by_asc(FileColumn::FilePath)
        .all(conn)
        .await?)
}

fn file_model(project_id: Uuid, path: &str, values: &MetricValues) -> FileActiveModel {
    FileActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        file_path: Set(path.to_string()),
        comment_ratio: Set(values.comment_ratio),
        cyclomatic_complexity: Set(values.cyclomatic_complexity),
        fanout_external: Set(values.fanout_external),
        fanout_internal: Set(values.fanout_internal),
        halstead_bugprop: Set(values.halstead_bugprop),
        halstead_difficulty: Set(values.halstead_difficulty),
        halstead_effort: Set(values.halstead_effort),
        halstead_timerequired: Set(values.halstead_timerequired),
        halstead_volume: Set(values.halstead_volume),
        programming_lang: Set(values.programming_lang.clone()),
        lines_of_code: Set(values.lines_of_code),
        maintainability_index: Set(values.maintainability_index),
        operands_sum: Set(values.operands_sum),
        operands_uniq: Set(values.operands_uniq),
        operators_sum: Set(values.operators_sum),
        operators_uniq: Set(values.operators_uniq),
        tiobe: Set(values.tiobe),
        tiobe_compiler: Set(values.tiobe_compiler),
        tiobe_complexity: Set(values.tiobe_complexity),
        tiobe_coverage: Set(values.tiobe_coverage),
        tiobe_duplication: Set(values.tiobe_duplication),
        tiobe_fanout: Set(values.tiobe_fanout),
        tiobe_functional: Set(values.tiobe_functional),
        tiobe_security: Set(values.tiobe_security),
        tiobe_standard: Set(values.tiobe_standard),
    }
}
