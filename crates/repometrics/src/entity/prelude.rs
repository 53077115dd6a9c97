//! Common re-exports for convenient entity usage.

pub use super::directory::{
    ActiveModel as DirectoryActiveModel, Column as DirectoryColumn, Entity as Directory,
    Model as DirectoryModel,
};
pub use super::file_code_metric::{
    ActiveModel as FileCodeMetricActiveModel, Column as FileCodeMetricColumn,
    Entity as FileCodeMetric, Model as FileCodeMetricModel,
};
pub use super::metric::{
    ActiveModel as MetricActiveModel, Column as MetricColumn, Entity as Metric,
    Model as MetricModel,
};
pub use super::project::{
    ActiveModel as ProjectActiveModel, Column as ProjectColumn, Entity as Project,
    Model as ProjectModel,
};
pub use super::project_metric::{
    ActiveModel as ProjectMetricActiveModel, Column as ProjectMetricColumn,
    Entity as ProjectMetric, Model as ProjectMetricModel,
};
pub use super::repository::{
    ActiveModel as RepositoryActiveModel, Column as RepositoryColumn, Entity as Repository,
    Model as RepositoryModel,
};
pub use super::source_file::{
    ActiveModel as SourceFileActiveModel, Column as SourceFileColumn, Entity as SourceFile,
    Model as SourceFileModel,
};
