//! Initial migration: repositories, projects, directories, files and metrics.

use sea_orm_migration::prelude::*;

/// Length of path columns; long enough for deep package trees and still indexable on MySQL.
const PATH_LEN: u32 = 512;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_repositories(manager).await?;
        self.create_projects(manager).await?;
        self.create_directories(manager).await?;
        self.create_files(manager).await?;
        self.create_metrics(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Metrics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Files::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Directories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Repositories::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_repositories(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Repositories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Repositories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // Identity
                    .col(
                        ColumnDef::new(Repositories::GithubId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Repositories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Repositories::FullName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Repositories::CloneUrl).text().not_null())
                    // Statistics
                    .col(
                        ColumnDef::new(Repositories::Stars)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Repositories::Forks)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    // Content
                    .col(ColumnDef::new(Repositories::Language).string().null())
                    .col(ColumnDef::new(Repositories::Description).text().null())
                    .col(
                        ColumnDef::new(Repositories::IsFork)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // Timestamps
                    .col(
                        ColumnDef::new(Repositories::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Repositories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Repositories::FetchedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup by directory name during analysis
        manager
            .create_index(
                Index::create()
                    .name("idx_repositories_name")
                    .table(Repositories::Table)
                    .col(Repositories::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_projects(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Projects::RepositoryId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Projects::Path)
                            .string_len(PATH_LEN)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Projects::TotalFiles)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Projects::TotalLinesOfCode)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Projects::AvgCyclomaticComplexity)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Projects::AnalyzedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_repository")
                            .from(Projects::Table, Projects::RepositoryId)
                            .to(Repositories::Table, Repositories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_directories(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Directories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Directories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Directories::ProjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(Directories::Path)
                            .string_len(PATH_LEN)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_directories_project")
                            .from(Directories::Table, Directories::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key: (project_id, path)
        manager
            .create_index(
                Index::create()
                    .name("idx_directories_project_path")
                    .table(Directories::Table)
                    .col(Directories::ProjectId)
                    .col(Directories::Path)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_files(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Files::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Files::DirectoryId).uuid().not_null())
                    .col(ColumnDef::new(Files::Name).string().not_null())
                    .col(ColumnDef::new(Files::Path).string_len(PATH_LEN).not_null())
                    .col(
                        ColumnDef::new(Files::LinesOfCode)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Files::CyclomaticComplexity)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_files_directory")
                            .from(Files::Table, Files::DirectoryId)
                            .to(Directories::Table, Directories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key: (directory_id, path)
        manager
            .create_index(
                Index::create()
                    .name("idx_files_directory_path")
                    .table(Files::Table)
                    .col(Files::DirectoryId)
                    .col(Files::Path)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_metrics(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Metrics::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Metrics::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Metrics::FileId).uuid().not_null())
                    .col(ColumnDef::new(Metrics::MetricName).string().not_null())
                    .col(ColumnDef::new(Metrics::MetricValue).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_metrics_file")
                            .from(Metrics::Table, Metrics::FileId)
                            .to(Files::Table, Files::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_metrics_file_name")
                    .table(Metrics::Table)
                    .col(Metrics::FileId)
                    .col(Metrics::MetricName)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Repositories {
    Table,
    Id,
    GithubId,
    Name,
    FullName,
    CloneUrl,
    Stars,
    Forks,
    Language,
    Description,
    IsFork,
    CreatedAt,
    UpdatedAt,
    FetchedAt,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    RepositoryId,
    Path,
    TotalFiles,
    TotalLinesOfCode,
    AvgCyclomaticComplexity,
    CreatedAt,
    AnalyzedAt,
}

#[derive(DeriveIden)]
enum Directories {
    Table,
    Id,
    ProjectId,
    Path,
}

#[derive(DeriveIden)]
enum Files {
    Table,
    Id,
    DirectoryId,
    Name,
    Path,
    LinesOfCode,
    CyclomaticComplexity,
}

#[derive(DeriveIden)]
enum Metrics {
    Table,
    Id,
    FileId,
    MetricName,
    MetricValue,
}
