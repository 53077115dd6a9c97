//! Flat multimetric schema: one row per project plus one row per staged file.

use sea_orm_migration::prelude::*;

const PATH_LEN: u32 = 512;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut projects = Table::create();
        projects
            .table(ProjectMetrics::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(ProjectMetrics::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(ProjectMetrics::ProjectName)
                    .string()
                    .not_null()
                    .unique_key(),
            );
        add_figure_columns(&mut projects);
        projects.col(
            ColumnDef::new(ProjectMetrics::AnalyzedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        );
        manager.create_table(projects.to_owned()).await?;

        let mut files = Table::create();
        files
            .table(FileCodeMetrics::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(FileCodeMetrics::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(FileCodeMetrics::ProjectId).uuid().not_null())
            .col(
                ColumnDef::new(FileCodeMetrics::FilePath)
                    .string_len(PATH_LEN)
                    .not_null(),
            );
        add_figure_columns(&mut files);
        files.foreign_key(
            ForeignKey::create()
                .name("fk_file_code_metrics_project")
                .from(FileCodeMetrics::Table, FileCodeMetrics::ProjectId)
                .to(ProjectMetrics::Table, ProjectMetrics::Id)
                .on_delete(ForeignKeyAction::Cascade),
        );
        manager.create_table(files.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_file_code_metrics_project")
                    .table(FileCodeMetrics::Table)
                    .col(FileCodeMetrics::ProjectId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FileCodeMetrics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectMetrics::Table).to_owned())
            .await
    }
}

/// Columns shared by both tables, in the order multimetric prints them.
fn add_figure_columns(table: &mut TableCreateStatement) {
    let doubles = [
        Figures::CommentRatio,
        Figures::HalsteadBugprop,
        Figures::HalsteadDifficulty,
        Figures::HalsteadEffort,
        Figures::HalsteadTimerequired,
        Figures::HalsteadVolume,
        Figures::MaintainabilityIndex,
        Figures::Tiobe,
        Figures::TiobeCompiler,
        Figures::TiobeComplexity,
        Figures::TiobeCoverage,
        Figures::TiobeDuplication,
        Figures::TiobeFanout,
        Figures::TiobeFunctional,
        Figures::TiobeSecurity,
        Figures::TiobeStandard,
    ];
    let integers = [
        Figures::CyclomaticComplexity,
        Figures::FanoutExternal,
        Figures::FanoutInternal,
        Figures::LinesOfCode,
        Figures::OperandsSum,
        Figures::OperandsUniq,
        Figures::OperatorsSum,
        Figures::OperatorsUniq,
    ];

    for column in doubles {
        table.col(ColumnDef::new(column).double().not_null().default(0.0));
    }
    for column in integers {
        table.col(ColumnDef::new(column).big_integer().not_null().default(0));
    }
    table.col(
        ColumnDef::new(Figures::ProgrammingLang)
            .string()
            .not_null()
            .default(""),
    );
}

#[derive(DeriveIden)]
enum ProjectMetrics {
    Table,
    Id,
    ProjectName,
    AnalyzedAt,
}

#[derive(DeriveIden)]
enum FileCodeMetrics {
    Table,
    Id,
    ProjectId,
    FilePath,
}

#[derive(DeriveIden, Clone, Copy)]
enum Figures {
    CommentRatio,
    CyclomaticComplexity,
    FanoutExternal,
    FanoutInternal,
    HalsteadBugprop,
    HalsteadDifficulty,
    HalsteadEffort,
    HalsteadTimerequired,
    HalsteadVolume,
    ProgrammingLang,
    LinesOfCode,
    MaintainabilityIndex,
    OperandsSum,
    OperandsUniq,
    OperatorsSum,
    OperatorsUniq,
    Tiobe,
    TiobeCompiler,
    TiobeComplexity,
    TiobeCoverage,
    TiobeDuplication,
    TiobeFanout,
    TiobeFunctional,
    TiobeSecurity,
    TiobeStandard,
}
