use repometrics::entity::project::Model as ProjectModel;
use repometrics::entity::repository::Model as RepositoryModel;
use repometrics::store::projects;

use crate::commands::{OutputFormat, print_rows};

/// One analyzed project for display.
#[derive(Debug, Clone, serde::Serialize, tabled::Tabled)]
pub(crate) struct ProjectRow {
    #[tabled(rename = "Repository")]
    pub repository: String,
    #[tabled(rename = "Stars")]
    pub stars: i32,
    #[tabled(rename = "Files")]
    pub total_files: i32,
    #[tabled(rename = "Lines")]
    pub total_lines_of_code: i64,
    #[tabled(rename = "Avg CC")]
    #[serde(serialize_with = "two_decimals")]
    pub avg_cyclomatic_complexity: f64,
    #[tabled(rename = "Analyzed")]
    pub analyzed_at: String,
}

fn two_decimals<S: serde::Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64((value * 100.0).round() / 100.0)
}

impl ProjectRow {
    pub(crate) fn new(project: &ProjectModel, repository: Option<&RepositoryModel>) -> Self {
        Self {
            repository: repository.map_or_else(|| project.path.clone(), |r| r.full_name.clone()),
            stars: repository.map_or(0, |r| r.stars),
            total_files: project.total_files,
            total_lines_of_code: project.total_lines_of_code,
            avg_cyclomatic_complexity: project.avg_cyclomatic_complexity,
            analyzed_at: project.analyzed_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub(crate) async fn handle_report(
    output: OutputFormat,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = repometrics::connect_and_migrate(database_url).await?;
    let rows: Vec<ProjectRow> = projects::list_with_repository(&db)
        .await?
        .iter()
        .map(|(project, repo)| ProjectRow::new(project, repo.as_ref()))
        .collect();

    if rows.is_empty() && matches!(output, OutputFormat::Table) {
        println!("No projects analyzed yet. Run `repometrics fetch` and `repometrics analyze`.");
        return Ok(());
    }
    print_rows(&rows, output)?;
    Ok(())
}
