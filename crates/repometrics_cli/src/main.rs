//! repometrics CLI - fetch, analyze and store metrics of open-source repositories.

mod commands;
mod config;
mod progress;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::commands::OutputFormat;

#[derive(Parser)]
#[command(name = "repometrics")]
#[command(version)]
#[command(about = "Software metric ingestion for open-source repositories")]
#[command(
    long_about = "repometrics searches GitHub for popular repositories, clones them, runs \
external static-analysis tools (radon, multimetric) on the checkouts and stores \
the normalized results in a relational database for later querying."
)]
#[command(after_long_help = r#"EXAMPLES
    Fetch and clone the 100 most starred Python repositories:
        $ repometrics fetch --limit 100

    Analyze every checkout under ./projects with radon:
        $ repometrics analyze --projects-dir projects

    Run multimetric over the same checkouts (flat schema):
        $ repometrics multimetric

    Show what has been analyzed:
        $ repometrics report --output json

CONFIGURATION
    repometrics reads configuration from:
      1. ~/.config/repometrics/config.toml (or $XDG_CONFIG_HOME/repometrics/config.toml)
      2. ./repometrics.toml
      3. Environment variables (REPOMETRICS_ prefix, e.g. REPOMETRICS_FETCH__MIN_STARS)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    REPOMETRICS_DATABASE__URL   Database connection string (default: ~/.local/state/repometrics/repometrics.db)
    REPOMETRICS_GITHUB__TOKEN   GitHub personal access token
    GITHUB_TOKEN                Used when no token is configured otherwise
    DATABASE_URL                Used when no database URL is configured otherwise
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search GitHub, clone matching repositories and store their metadata
    Fetch(FetchArgs),
    /// Run radon on every project directory and store per-file metrics
    Analyze {
        /// Directory containing one checkout per project (default from config or "projects")
        #[arg(short, long)]
        projects_dir: Option<PathBuf>,

        /// radon executable (default from config or "radon")
        #[arg(long)]
        radon: Option<String>,
    },
    /// Run multimetric on every project and store the flat metrics
    Multimetric {
        /// Directory containing one checkout per project (default from config or "projects")
        #[arg(short, long)]
        projects_dir: Option<PathBuf>,

        /// Where staged copies are written (default from config or "Analysis")
        #[arg(short, long)]
        analysis_dir: Option<PathBuf>,

        /// multimetric executable (default from config or "multimetric")
        #[arg(long)]
        multimetric: Option<String>,
    },
    /// Delete every row from every table
    ResetDb {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List analyzed projects with their aggregates
    Report {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Show the GitHub API rate limits
    Limits {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,

        /// Directory to write the script into (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Options for `repometrics fetch`; unset values come from config.
#[derive(Debug, Clone, clap::Args)]
struct FetchArgs {
    /// Maximum number of search results to examine
    #[arg(short, long)]
    limit: Option<usize>,

    /// Repository language to search for
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Only repositories with more stars than this
    #[arg(short = 's', long)]
    min_stars: Option<u32>,

    /// Results per search page (1-100)
    #[arg(long)]
    per_page: Option<u32>,

    /// Where repositories are cloned
    #[arg(short, long)]
    clone_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Interactive runs get progress bars instead of log lines.
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("repometrics=info,repometrics_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config = config::Config::load();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Completions { shell, output } => {
            commands::meta::handle_completions(*shell, output.clone())?;
            return Ok(());
        }
        Commands::Man { output } => {
            commands::meta::handle_man(output.clone())?;
            return Ok(());
        }
        Commands::Limits { output } => {
            commands::limits::handle_limits(*output, &config).await?;
            return Ok(());
        }
        _ => {}
    }

    let database_url = config
        .database_url()
        .ok_or("Could not determine a database URL; set REPOMETRICS_DATABASE__URL")?;
    prepare_sqlite_path(&database_url)?;

    match cli.command {
        Commands::Fetch(args) => {
            commands::fetch::handle_fetch(args, &config, &database_url).await?;
        }
        Commands::Analyze {
            projects_dir,
            radon,
        } => {
            commands::analyze::handle_analyze(projects_dir, radon, &config, &database_url)
                .await?;
        }
        Commands::Multimetric {
            projects_dir,
            analysis_dir,
            multimetric,
        } => {
            commands::analyze::handle_multimetric(
                projects_dir,
                analysis_dir,
                multimetric,
                &config,
                &database_url,
            )
            .await?;
        }
        Commands::ResetDb { yes } => {
            commands::reset::handle_reset(yes, &database_url).await?;
        }
        Commands::Report { output } => {
            commands::report::handle_report(output, &database_url).await?;
        }
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await?;
        }
        Commands::Limits { .. } | Commands::Completions { .. } | Commands::Man { .. } => {}
    }

    Ok(())
}

/// Create the parent directory of a SQLite database file.
fn prepare_sqlite_path(database_url: &str) -> std::io::Result<()> {
    let Some(db_path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let db_path = db_path.split('?').next().unwrap_or(db_path);
    let db_path = std::path::Path::new(db_path);

    if db_path.is_relative() && !db_path.as_os_str().is_empty() {
        tracing::warn!(
            "Database path '{}' is relative - behavior depends on current directory. \
             Consider using an absolute path.",
            db_path.display()
        );
    }

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
