use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, warn};
use uuid::Uuid;

use super::report::{AnalysisReport, normalize_report};
use crate::error::PipelineError;
use crate::store::{
    FileRow, ProjectTotals, directories, files, metrics, projects, repositories,
};

/// What [`save_metrics`] did with a project.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectOutcome {
    /// Project, directories, files and metrics were written.
    Saved {
        project_id: Uuid,
        files: usize,
        metrics: usize,
        totals: ProjectTotals,
    },
    /// No repository is named after the project directory; nothing was written.
    RepositoryMissing,
}

/// Persist one project's report in a single transaction.
///
/// The repository is looked up by `project_name` (its clone directory name).
/// The project row is refreshed even when the report lists no files, and each
/// file's metric rows are replaced.
pub async fn save_metrics(
    db: &DatabaseConnection,
    project_name: &str,
    project_path: &str,
    report: &AnalysisReport,
) -> Result<ProjectOutcome, PipelineError> {
    let txn = db.begin().await?;

    let Some(repository) = repositories::find_by_name(&txn, project_name).await? else {
        warn!(project = project_name, "no repository row for project, skipping");
        txn.rollback().await?;
        return Ok(ProjectOutcome::RepositoryMissing);
    };

    let file_metrics = normalize_report(report);
    let totals = ProjectTotals::from_files(
        file_metrics
            .iter()
            .map(|f| (f.lines_of_code, f.cyclomatic_complexity)),
    );
    let project = projects::upsert(&txn, repository.id, project_path, totals).await?;

    let mut metric_rows = 0;
    for file in &file_metrics {
        let directory = directories::find_or_create(&txn, project.id, &file.directory).await?;
        let row = files::upsert(
            &txn,
            directory.id,
            FileRow {
                name: &file.name,
                path: &file.path,
                lines_of_code: file.lines_of_code,
                cyclomatic_complexity: file.cyclomatic_complexity,
            },
        )
        .await?;
        metric_rows += metrics::replace_for_file(&txn, row.id, &file.metrics).await?;
    }

    txn.commit().await?;
    debug!(
        project = project_name,
        files = file_metrics.len(),
        metrics = metric_rows,
        "saved project metrics"
    );

    Ok(ProjectOutcome::Saved {
        project_id: project.id,
        files: file_metrics.len(),
        metrics: metric_rows,
        totals,
    })
}
