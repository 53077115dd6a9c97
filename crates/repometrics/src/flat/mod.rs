//! Multimetric pipeline writing the flat `project_metrics` / `file_code_metrics` schema.
//!
//! Each project's Python files are copied into one flat staging directory,
//! `multimetric` runs over the copies, and the overall and per-file figures
//! are stored keyed by project name. This schema is independent of the
//! repository/project tables written by [`crate::analyze`].

mod files;
mod report;
mod runner;

use std::path::Path;

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub use files::{ANALYSIS_SUFFIX, ProjectFiles, collect_python_files, stage_analysis_dir};
pub use report::{FlatReport, MetricValues};
pub use runner::{FlatAnalyzer, MultimetricRunner};

use crate::error::PipelineError;
use crate::events::{PipelineEvent, ProgressCallback, emit};
use crate::store::flat::{replace_file_metrics, upsert_project_metric};

/// Rows written by [`save_flat_metrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatSaved {
    pub project_id: Uuid,
    pub files: usize,
}

/// Outcome of a multimetric run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlatSummary {
    pub analyzed: usize,
    /// Projects without Python files.
    pub skipped: usize,
    pub files: usize,
    pub tool_failures: usize,
}

/// Upsert the project row by name and replace its file rows, in one transaction.
pub async fn save_flat_metrics(
    db: &DatabaseConnection,
    project_name: &str,
    report: &FlatReport,
) -> Result<FlatSaved, PipelineError> {
    let txn = db.begin().await?;
    let project = upsert_project_metric(&txn, project_name, &report.overall).await?;
    let files = replace_file_metrics(&txn, project.id, &report.files).await?;
    txn.commit().await?;

    debug!(project = project_name, files, "saved flat metrics");
    Ok(FlatSaved {
        project_id: project.id,
        files,
    })
}

/// Stage, analyze and save every project under `projects_dir`.
///
/// Projects without any `.py` file are skipped. A multimetric failure still
/// records the project, with zeroed figures.
pub async fn process_flat(
    db: &DatabaseConnection,
    analyzer: &dyn FlatAnalyzer,
    projects_dir: &Path,
    analysis_dir: &Path,
    on_progress: Option<&ProgressCallback>,
) -> Result<FlatSummary, PipelineError> {
    let projects = collect_python_files(projects_dir)?;
    let mut summary = FlatSummary::default();

    info!(
        dir = %projects_dir.display(),
        analysis_dir = %analysis_dir.display(),
        projects = projects.len(),
        "starting multimetric analysis"
    );
    emit(
        on_progress,
        PipelineEvent::AnalyzeStarted {
            projects: projects.len(),
        },
    );

    for project in &projects {
        let name = project.name.clone();
        if project.python_files.is_empty() {
            debug!(project = %name, "no python files");
            summary.skipped += 1;
            emit(on_progress, PipelineEvent::ProjectSkipped { name });
            continue;
        }

        let staged = stage_analysis_dir(project, analysis_dir)?;
        emit(
            on_progress,
            PipelineEvent::ProjectStaged {
                name: name.clone(),
                files: staged.len(),
            },
        );
        emit(
            on_progress,
            PipelineEvent::AnalyzingProject { name: name.clone() },
        );

        let report = analyzer.analyze(&staged).await;
        if let Some(failed) = &report.failure {
            warn!(project = %name, tool = %failed.tool, error = %failed.failure, "analyzer failed");
            summary.tool_failures += 1;
            emit(
                on_progress,
                PipelineEvent::ToolFailed {
                    project: name.clone(),
                    tool: failed.tool.clone(),
                    error: failed.failure.to_string(),
                },
            );
        }

        let saved = save_flat_metrics(db, &name, &report).await?;
        summary.analyzed += 1;
        summary.files += saved.files;
        emit(
            on_progress,
            PipelineEvent::ProjectSaved {
                name,
                files: saved.files,
            },
        );
    }

    info!(
        analyzed = summary.analyzed,
        skipped = summary.skipped,
        files = summary.files,
        "multimetric analysis finished"
    );
    emit(
        on_progress,
        PipelineEvent::AnalyzeComplete {
            analyzed: summary.analyzed,
            skipped: summary.skipped,
        },
    );

    Ok(summary)
}
