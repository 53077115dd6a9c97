//! repometrics - software metric ingestion for open-source repositories.
//!
//! The library fetches repositories from the GitHub search API, clones them,
//! runs external static-analysis tools (`radon`, `multimetric`) against the
//! checkouts and stores the normalized results in a relational schema.
//!
//! # Features
//!
//! - `sqlite`, `postgres`, `mysql` - database backends for sea-orm.
//! - `migrate` - Enables database migration support. When enabled, you can use
//!   [`connect_and_migrate`] to create the schema on connection.
//!
//! # Example
//!
//! ```ignore
//! use repometrics::analyze::{RadonAnalyzer, process_projects};
//!
//! let db = repometrics::connect_and_migrate("sqlite://metrics.db?mode=rwc").await?;
//! let analyzer = RadonAnalyzer::default();
//! let summary = process_projects(&db, &analyzer, "projects".as_ref(), None).await?;
//! println!("analyzed {} projects", summary.analyzed);
//! ```

pub mod analyze;
pub mod db;
pub mod entity;
pub mod error;
pub mod events;
pub mod fetch;
pub mod flat;
pub mod github;
pub mod http;
pub mod store;
pub mod tool;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use error::PipelineError;
pub use events::{PipelineEvent, ProgressCallback, emit};
pub use store::StoreError;
