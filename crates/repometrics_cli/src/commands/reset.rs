use std::io::{BufRead, Write};

use console::Term;
use repometrics::store::{ResetCounts, reset_all};

/// Whether a confirmation answer means yes.
fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Ask on stdout and read one line from `input`.
fn confirm(mut input: impl BufRead) -> std::io::Result<bool> {
    print!("This deletes every repository, project and metric row. Continue? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_confirmation(&answer))
}

pub(crate) async fn handle_reset(
    yes: bool,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let is_tty = Term::stdout().is_term();

    if !yes {
        if !is_tty {
            return Err("refusing to reset the database without --yes in non-interactive mode".into());
        }
        if !confirm(std::io::stdin().lock())? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let db = repometrics::connect_and_migrate(database_url).await?;
    let counts = reset_all(&db).await?;
    report(&counts, is_tty);
    Ok(())
}

fn report(counts: &ResetCounts, is_tty: bool) {
    if is_tty {
        println!("Deleted {} rows:", counts.total());
        for (table, rows) in [
            ("metrics", counts.metrics),
            ("files", counts.files),
            ("directories", counts.directories),
            ("projects", counts.projects),
            ("repositories", counts.repositories),
            ("file_code_metrics", counts.file_code_metrics),
            ("project_metrics", counts.project_metrics),
        ] {
            println!("  {table:<18} {rows}");
        }
    } else {
        tracing::info!(
            metrics = counts.metrics,
            files = counts.files,
            directories = counts.directories,
            projects = counts.projects,
            repositories = counts.repositories,
            file_code_metrics = counts.file_code_metrics,
            project_metrics = counts.project_metrics,
            "Database reset"
        );
    }
}
