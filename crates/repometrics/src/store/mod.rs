//! Data access for the metrics schema.
//!
//! Every function is generic over [`sea_orm::ConnectionTrait`], so it runs
//! the same against a connection or inside a transaction. Upserts look rows
//! up by natural key (GitHub ID, repository, project + path, directory +
//! path, project name) and update them in place.

pub mod directories;
mod errors;
pub mod files;
pub mod flat;
pub mod metrics;
pub mod projects;
pub mod repositories;
mod reset;

pub use errors::{Result, StoreError};
pub use files::FileRow;
pub use projects::ProjectTotals;
pub use reset::{ResetCounts, reset_all};
