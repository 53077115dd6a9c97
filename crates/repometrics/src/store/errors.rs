use sea_orm::DbErr;
use thiserror::Error;

/// Errors that can occur during data access.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
