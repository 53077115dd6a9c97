//! Project rows: one aggregate per analyzed repository checkout.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::project::{ActiveModel, Column, Entity as Project, Model};
use crate::entity::repository::{Entity as Repository, Model as RepositoryModel};

use super::errors::Result;

/// Project-level aggregates computed from per-file results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProjectTotals {
    pub total_files: i32,
    pub total_lines_of_code: i64,
    pub avg_cyclomatic_complexity: f64,
}

impl ProjectTotals {
    /// Aggregate `(lines_of_code, cyclomatic_complexity)` pairs.
    ///
    /// The average is 0 when there are no files.
    pub fn from_files(files: impl IntoIterator<Item = (i64, f64)>) -> Self {
        let mut count: i32 = 0;
        let mut lines: i64 = 0;
        let mut complexity = 0.0;
        for (loc, cc) in files {
            count = count.saturating_add(1);
            lines = lines.saturating_add(loc);
            complexity += cc;
        }
        Self {
            total_files: count,
            total_lines_of_code: lines,
            avg_cyclomatic_complexity: if count == 0 {
                0.0
            } else {
                complexity / f64::from(count)
            },
        }
    }
}

/// Find the project of a repository.
pub async fn find_by_repository<C: ConnectionTrait>(
    conn: &C,
    repository_id: Uuid,
) -> Result<Option<Model>> {
    Ok(Project::find()
        .filter(Column::RepositoryId.eq(repository_id))
        .one(conn)
        .await?)
}

/// Insert or update the project of a repository.
///
/// An existing project keeps its ID and `created_at`; path, totals and
/// `analyzed_at` are overwritten.
pub async fn upsert<C: ConnectionTrait>(
    conn: &C,
    repository_id: Uuid,
    path: &str,
    totals: ProjectTotals,
) -> Result<Model> {
    let now = Utc::now().fixed_offset();

    match find_by_repository(conn, repository_id).await? {
        Some(existing) => {
            let mut model = existing.into_active_model();
            model.path = Set(path.to_string());
            model.total_files = Set(totals.total_files);
            model.total_lines_of_code = Set(totals.total_lines_of_code);
            model.avg_cyclomatic_complexity = Set(totals.avg_cyclomatic_complexity);
            model.analyzed_at = Set(now);
            Ok(model.update(conn).await?)
        }
        None => {
            let model = ActiveModel {
                id: Set(Uuid::new_v4()),
                repository_id: Set(repository_id),
                path: Set(path.to_string()),
                total_files: Set(totals.total_files),
                total_lines_of_code: Set(totals.total_lines_of_code),
                avg_cyclomatic_complexity: Set(totals.avg_cyclomatic_complexity),
                created_at: Set(now),
                analyzed_at: Set(now),
            };
            Ok(model.insert(conn).await?)
        }
    }
}

/// List projects with their repositories, largest first.
pub async fn list_with_repository<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<(Model, Option<RepositoryModel>)>> {
    Ok(Project::find()
        .find_also_related(Repository)
        .order_by_desc(Column::TotalLinesOfCode)
        .order_by_asc(Column::Path)
        .all(conn)
        .await?)
}
