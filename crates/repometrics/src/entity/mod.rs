//! SeaORM entity definitions for the metrics database schema.
//!
//! Two independent schemas live side by side:
//!
//! - the normalized chain `repositories → projects → directories → files → metrics`
//!   fed by the radon pipeline, and
//! - the flat pair `project_metrics → file_code_metrics` fed by multimetric.

pub mod directory;
pub mod file_code_metric;
pub mod metric;
pub mod prelude;
pub mod project;
pub mod project_metric;
pub mod repository;
pub mod source_file;
