use std::path::PathBuf;
use std::sync::Arc;

use console::Term;
use repometrics::analyze::{RadonAnalyzer, process_projects};
use repometrics::flat::{MultimetricRunner, process_flat};

use crate::config::Config;
use crate::progress::ProgressReporter;

pub(crate) async fn handle_analyze(
    projects_dir: Option<PathBuf>,
    radon: Option<String>,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let projects_dir = projects_dir.unwrap_or_else(|| config.analyze.projects_dir.clone());
    let analyzer = RadonAnalyzer::new(radon.unwrap_or_else(|| config.analyze.radon.clone()));

    let db = repometrics::connect_and_migrate(database_url).await?;
    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();
    let summary = process_projects(&db, &analyzer, &projects_dir, Some(&callback)).await?;
    reporter.finish();

    if Term::stdout().is_term() {
        println!(
            "\nAnalyzed {} projects ({} files), skipped {} without a repository",
            summary.analyzed, summary.files, summary.skipped
        );
        if summary.tool_failures > 0 {
            println!(
                "{} {} invocations failed; their metrics were stored as zero",
                summary.tool_failures,
                analyzer.executable()
            );
        }
    } else {
        tracing::info!(
            analyzed = summary.analyzed,
            skipped = summary.skipped,
            files = summary.files,
            tool_failures = summary.tool_failures,
            "Analyze summary"
        );
    }
    Ok(())
}

pub(crate) async fn handle_multimetric(
    projects_dir: Option<PathBuf>,
    analysis_dir: Option<PathBuf>,
    multimetric: Option<String>,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let projects_dir = projects_dir.unwrap_or_else(|| config.analyze.projects_dir.clone());
    let analysis_dir = analysis_dir.unwrap_or_else(|| config.analyze.analysis_dir.clone());
    let runner =
        MultimetricRunner::new(multimetric.unwrap_or_else(|| config.analyze.multimetric.clone()));

    let db = repometrics::connect_and_migrate(database_url).await?;
    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();
    let summary =
        process_flat(&db, &runner, &projects_dir, &analysis_dir, Some(&callback)).await?;
    reporter.finish();

    if Term::stdout().is_term() {
        println!(
            "\nStored multimetric results for {} projects ({} files), {} without Python files",
            summary.analyzed, summary.files, summary.skipped
        );
    } else {
        tracing::info!(
            analyzed = summary.analyzed,
            skipped = summary.skipped,
            files = summary.files,
            tool_failures = summary.tool_failures,
            "Multimetric summary"
        );
    }
    Ok(())
}
