use sea_orm::DbErr;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that stop a pipeline run.
///
/// Per-item problems (a failed clone, a tool that printed garbage, a project
/// without a repository row) are logged and skipped; only storage and
/// filesystem failures end a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
