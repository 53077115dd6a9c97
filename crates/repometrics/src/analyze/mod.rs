//! Analyze pipeline: run radon on every checkout and persist the results.
//!
//! # Module Structure
//!
//! - [`runner`] - The [`MetricsAnalyzer`] seam and the radon implementation
//! - [`report`] - Radon documents and their normalization into file rows
//! - [`persist`] - Writing one project's rows in a transaction

mod persist;
pub mod report;
mod runner;

use std::path::{Path, PathBuf};

use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{info, warn};

pub use crate::store::ProjectTotals;
pub use persist::{ProjectOutcome, save_metrics};
pub use report::{AnalysisReport, FileMetrics, ToolError, normalize_report};
pub use runner::{MetricsAnalyzer, RADON_COMMANDS, RadonAnalyzer};

use crate::error::PipelineError;
use crate::events::{PipelineEvent, ProgressCallback, emit};

/// Outcome of an analyze run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalyzeSummary {
    /// Projects whose metrics were saved.
    pub analyzed: usize,
    /// Projects without a matching repository row.
    pub skipped: usize,
    /// Files written over all projects.
    pub files: usize,
    /// Tool invocations that produced no usable output.
    pub tool_failures: usize,
}

/// Sub-directories of `projects_dir`, sorted by name.
pub async fn project_dirs(projects_dir: &Path) -> Result<Vec<(String, PathBuf)>, PipelineError> {
    let mut entries = tokio::fs::read_dir(projects_dir)
        .await
        .map_err(|e| PipelineError::io(projects_dir, e))?;

    let mut dirs = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| PipelineError::io(projects_dir, e))?
    {
        let path = entry.path();
        let is_dir = entry
            .file_type()
            .await
            .map_err(|e| PipelineError::io(&path, e))?
            .is_dir();
        if is_dir {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), path));
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Analyze and save every project directory under `projects_dir`, one at a time.
///
/// # Errors
/// Returns an error if `projects_dir` cannot be read or a database write fails.
/// Tool failures and unknown projects are logged and counted.
pub async fn process_projects(
    db: &DatabaseConnection,
    analyzer: &dyn MetricsAnalyzer,
    projects_dir: &Path,
    on_progress: Option<&ProgressCallback>,
) -> Result<AnalyzeSummary, PipelineError> {
    let dirs = project_dirs(projects_dir).await?;
    let mut summary = AnalyzeSummary::default();

    info!(dir = %projects_dir.display(), projects = dirs.len(), "starting analysis");
    emit(
        on_progress,
        PipelineEvent::AnalyzeStarted {
            projects: dirs.len(),
        },
    );

    for (name, path) in dirs {
        emit(
            on_progress,
            PipelineEvent::AnalyzingProject { name: name.clone() },
        );

        let report = analyzer.analyze(&path).await;
        for failed in &report.failures {
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

        let project_path = path.to_string_lossy();
        match save_metrics(db, &name, &project_path, &report).await? {
            ProjectOutcome::Saved { files, .. } => {
                summary.analyzed += 1;
                summary.files += files;
                emit(on_progress, PipelineEvent::ProjectSaved { name, files });
            }
            ProjectOutcome::RepositoryMissing => {
                summary.skipped += 1;
                emit(on_progress, PipelineEvent::ProjectSkipped { name });
            }
        }
    }

    info!(
        analyzed = summary.analyzed,
        skipped = summary.skipped,
        files = summary.files,
        "analysis finished"
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn project_dirs_lists_only_directories_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("zeta")).expect("mkdir");
        std::fs::create_dir(dir.path().join("alpha")).expect("mkdir");
        std::fs::write(dir.path().join("notes.txt"), "x").expect("write");

        let names: Vec<_> = project_dirs(dir.path())
            .await
            .expect("list")
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn missing_projects_dir_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = project_dirs(&dir.path().join("absent"))
            .await
            .expect_err("should fail");
        assert!(matches!(err, PipelineError::Io { .. }));
    }

    #[cfg(all(feature = "sqlite", feature = "migrate"))]
    mod pipeline {
        use async_trait::async_trait;
        use chrono::Utc;
        use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
        use serde_json::json;
        use uuid::Uuid;

        use super::*;
        use crate::connect_and_migrate;
        use crate::entity::prelude::{Directory, Metric, Project, SourceFile};
        use crate::entity::repository::ActiveModel as RepositoryActiveModel;
        use crate::tool::ToolFailure;

        /// Returns a fixed report for every project, keyed under its path.
        struct FakeAnalyzer;

        #[async_trait]
        impl MetricsAnalyzer for FakeAnalyzer {
            async fn analyze(&self, project: &Path) -> AnalysisReport {
                let base = project.to_string_lossy();
                let file = |name: &str| format!("{base}/pkg/{name}");
                let to_map = |v: serde_json::Value| match v {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };
                AnalysisReport {
                    complexity: to_map(json!({
                        file("core.py"): [{"type": "function", "name": "run", "complexity": 4}],
                        file("util.py"): [{"type": "function", "name": "helper", "complexity": 2}]
                    })),
                    maintainability: to_map(json!({file("core.py"): {"mi": 60.0}})),
                    raw_metrics: to_map(json!({
                        file("core.py"): {"loc": 120, "comments": 10},
                        file("util.py"): {"loc": 30, "comments": 0}
                    })),
                    halstead: serde_json::Map::new(),
                    failures: vec![ToolError {
                        tool: "radon hal".to_string(),
                        failure: ToolFailure::EmptyOutput,
                    }],
                }
            }
        }

        async fn insert_repo(db: &DatabaseConnection, github_id: i64, name: &str) {
            RepositoryActiveModel {
                id: Set(Uuid::new_v4()),
                github_id: Set(github_id),
                name: Set(name.to_string()),
                full_name: Set(format!("owner/{name}")),
                clone_url: Set(format!("https://github.com/owner/{name}.git")),
                stars: Set(1000),
                forks: Set(10),
                language: Set(Some("Python".to_string())),
                description: Set(None),
                is_fork: Set(false),
                created_at: Set(None),
                updated_at: Set(None),
                fetched_at: Set(Utc::now().fixed_offset()),
            }
            .insert(db)
            .await
            .expect("repository should insert");
        }

        async fn row_counts(db: &DatabaseConnection) -> (u64, u64, u64, u64) {
            (
                Project::find().count(db).await.expect("count"),
                Directory::find().count(db).await.expect("count"),
                SourceFile::find().count(db).await.expect("count"),
                Metric::find().count(db).await.expect("count"),
            )
        }

        #[tokio::test]
        async fn analyzing_twice_updates_rows_in_place() {
            let db = connect_and_migrate("sqlite::memory:")
                .await
                .expect("test db should migrate");
            insert_repo(&db, 1, "known").await;

            let dir = tempfile::tempdir().expect("tempdir");
            std::fs::create_dir(dir.path().join("known")).expect("mkdir");
            std::fs::create_dir(dir.path().join("stranger")).expect("mkdir");

            let summary = process_projects(&db, &FakeAnalyzer, dir.path(), None)
                .await
                .expect("first run");
            assert_eq!(
                summary,
                AnalyzeSummary {
                    analyzed: 1,
                    skipped: 1,
                    files: 2,
                    tool_failures: 2,
                }
            );

            let projects = Project::find().all(&db).await.expect("projects");
            assert_eq!(projects.len(), 1);
            assert_eq!(projects[0].total_files, 2);
            assert_eq!(projects[0].total_lines_of_code, 150);
            assert!((projects[0].avg_cyclomatic_complexity - 3.0).abs() < 1e-9);

            let first = row_counts(&db).await;
            assert_eq!(first, (1, 1, 2, 26));

            process_projects(&db, &FakeAnalyzer, dir.path(), None)
                .await
                .expect("second run");
            let second = row_counts(&db).await;
            assert_eq!(first, second);
        }

        #[tokio::test]
        async fn empty_report_still_records_project() {
            let db = connect_and_migrate("sqlite::memory:")
                .await
                .expect("test db should migrate");
            insert_repo(&db, 2, "empty").await;

            let outcome = save_metrics(&db, "empty", "projects/empty", &AnalysisReport::default())
                .await
                .expect("save");

            match outcome {
                ProjectOutcome::Saved { files, totals, .. } => {
                    assert_eq!(files, 0);
                    assert_eq!(totals, ProjectTotals::default());
                }
                other => panic!("unexpected outcome: {other:?}"),
            }
            assert_eq!(Project::find().count(&db).await.expect("count"), 1);
        }

        #[tokio::test]
        async fn unknown_project_writes_nothing() {
            let db = connect_and_migrate("sqlite::memory:")
                .await
                .expect("test db should migrate");

            let outcome = save_metrics(&db, "ghost", "projects/ghost", &AnalysisReport::default())
                .await
                .expect("save");

            assert_eq!(outcome, ProjectOutcome::RepositoryMissing);
            assert_eq!(Project::find().count(&db).await.expect("count"), 0);
        }
    }
}
