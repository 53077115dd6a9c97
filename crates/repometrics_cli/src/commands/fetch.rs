use std::sync::Arc;

use console::Term;
use repometrics::fetch::{FetchOptions, FetchSummary, GitCloner, fetch_repositories};
use repometrics::github::SearchQuery;

use crate::FetchArgs;
use crate::commands::limits::github_client;
use crate::config::Config;
use crate::progress::ProgressReporter;

/// Merge CLI flags over config defaults.
pub(crate) fn fetch_options(args: &FetchArgs, config: &Config) -> FetchOptions {
    let fetch = &config.fetch;
    FetchOptions {
        query: SearchQuery {
            language: args.language.clone().unwrap_or_else(|| fetch.language.clone()),
            min_stars: args.min_stars.unwrap_or(fetch.min_stars),
            per_page: args.per_page.unwrap_or(fetch.per_page),
            ..SearchQuery::default()
        },
        limit: args.limit.unwrap_or(fetch.limit),
        english_threshold: fetch.english_threshold,
    }
}

pub(crate) async fn handle_fetch(
    args: FetchArgs,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = fetch_options(&args, config);
    let clone_dir = args.clone_dir.unwrap_or_else(|| config.fetch.clone_dir.clone());
    let client = github_client(config);
    let is_tty = Term::stdout().is_term();

    // The rate limit is informational; a failure here should not stop the run.
    match client.rate_limit().await {
        Ok(limit) if is_tty => println!(
            "Search rate limit: {}/{} remaining (resets at {})\n",
            limit.remaining,
            limit.limit,
            limit.reset_at().format("%H:%M:%S UTC")
        ),
        Ok(limit) => tracing::info!(
            remaining = limit.remaining,
            limit = limit.limit,
            "Search rate limit status"
        ),
        Err(e) => tracing::warn!(error = %e, "Could not read rate limit"),
    }

    let db = repometrics::connect_and_migrate(database_url).await?;
    let cloner = GitCloner::new(clone_dir);

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();
    let summary = fetch_repositories(&db, &client, &cloner, &options, Some(&callback)).await?;
    reporter.finish();

    print_summary(&summary, is_tty);
    Ok(())
}

fn print_summary(summary: &FetchSummary, is_tty: bool) {
    if is_tty {
        println!(
            "\nStored {} of {} repositories examined ({} non-English, {} already stored, {} clone failures)",
            summary.stored,
            summary.examined,
            summary.skipped_non_english,
            summary.skipped_duplicate,
            summary.clone_failures
        );
        if summary.aborted {
            println!("The search API returned an error; the run stopped early.");
        }
    } else {
        tracing::info!(
            stored = summary.stored,
            examined = summary.examined,
            pages = summary.pages,
            skipped_non_english = summary.skipped_non_english,
            skipped_duplicate = summary.skipped_duplicate,
            clone_failures = summary.clone_failures,
            aborted = summary.aborted,
            "Fetch summary"
        );
    }
}
