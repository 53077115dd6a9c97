use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use serde::Serialize;

use crate::entity::prelude::{
    Directory, FileCodeMetric, Metric, Project, ProjectMetric, Repository, SourceFile,
};

use super::errors::Result;

/// Rows deleted per table by [`reset_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResetCounts {
    pub metrics: u64,
    pub files: u64,
    pub directories: u64,
    pub projects: u64,
    pub repositories: u64,
    pub file_code_metrics: u64,
    pub project_metrics: u64,
}

impl ResetCounts {
    pub fn total(&self) -> u64 {
        self.metrics
            + self.files
            + self.directories
            + self.projects
            + self.repositories
            + self.file_code_metrics
            + self.project_metrics
    }
}

/// Delete every row of every table, children first, in one transaction.
pub async fn reset_all(db: &DatabaseConnection) -> Result<ResetCounts> {
    let txn = db.begin().await?;

    let counts = ResetCounts {
        metrics: Metric::delete_many().exec(&txn).await?.rows_affected,
        files: SourceFile::delete_many().exec(&txn).await?.rows_affected,
        directories: Directory::delete_many().exec(&txn).await?.rows_affected,
        projects: Project::delete_many().exec(&txn).await?.rows_affected,
        repositories: Repository::delete_many().exec(&txn).await?.rows_affected,
        file_code_metrics: FileCodeMetric::delete_many().exec(&txn).await?.rows_affected,
        project_metrics: ProjectMetric::delete_many().exec(&txn).await?.rows_affected,
    };

    txn.commit().await?;
    Ok(counts)
}
