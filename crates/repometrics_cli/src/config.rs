//! Configuration file support for repometrics.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables prefixed with `REPOMETRICS_`, section and key
//!    separated by `__` (e.g. `REPOMETRICS_FETCH__MIN_STARS=1000`)
//! 3. Local config file (`./repometrics.toml`)
//! 4. XDG config file (`~/.config/repometrics/config.toml`)
//! 5. Legacy variables `GITHUB_TOKEN` and `DATABASE_URL`
//! 6. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "postgres://metrics@localhost/metrics"  # default: SQLite in the XDG state dir
//!
//! [github]
//! token = "ghp_..."
//!
//! [fetch]
//! limit = 100
//! language = "Python"
//! min_stars = 500
//! clone_dir = "projects"
//!
//! [analyze]
//! projects_dir = "projects"
//! analysis_dir = "Analysis"
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use repometrics::fetch::DEFAULT_ENGLISH_THRESHOLD;
use repometrics::github::{DEFAULT_API_URL, DEFAULT_PER_PAGE};
use serde::Deserialize;

const APP_NAME: &str = "repometrics";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub github: GitHubConfig,
    pub fetch: FetchConfig,
    pub analyze: AnalyzeConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL (`sqlite://`, `postgres://` or `mysql://`).
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Personal access token; unauthenticated search is heavily rate limited.
    pub token: Option<String>,
    pub api_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Defaults for `repometrics fetch`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub limit: usize,
    pub language: String,
    pub min_stars: u32,
    pub per_page: u32,
    pub clone_dir: PathBuf,
    pub english_threshold: f64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            language: "Python".to_string(),
            min_stars: 500,
            per_page: DEFAULT_PER_PAGE,
            clone_dir: PathBuf::from("projects"),
            english_threshold: DEFAULT_ENGLISH_THRESHOLD,
        }
    }
}

/// Defaults for `repometrics analyze` and `repometrics multimetric`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    pub projects_dir: PathBuf,
    pub radon: String,
    pub multimetric: String,
    pub analysis_dir: PathBuf,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            projects_dir: PathBuf::from("projects"),
            radon: "radon".to_string(),
            multimetric: "multimetric".to_string(),
            analysis_dir: PathBuf::from("Analysis"),
        }
    }
}

impl Config {
    /// Load configuration from every source, falling back to defaults on error.
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        // Lowest priority: variables other tools already use.
        for (var, key) in [("GITHUB_TOKEN", "github.token"), ("DATABASE_URL", "database.url")] {
            if let Ok(value) = std::env::var(var)
                && !value.is_empty()
            {
                builder = match builder.set_default(key, value) {
                    Ok(b) => b,
                    Err(e) => {
                        tracing::warn!("Ignoring {}: {}", var, e);
                        return Self::default();
                    }
                };
            }
        }

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("repometrics.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./repometrics.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("REPOMETRICS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        match Self::from_builder(builder) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config: {}", e);
                Config::default()
            }
        }
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// Database URL, defaulting to a SQLite file in the state directory.
    ///
    /// The default carries `mode=rwc` so the file is created on first use.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("repometrics.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone().filter(|t| !t.is_empty())
    }

    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// On Linux, `$XDG_STATE_HOME/repometrics` or `~/.local/state/repometrics`.
    /// Elsewhere the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(content: &str) -> Config {
        Config::from_builder(
            ConfigBuilder::builder().add_source(File::from_str(content, FileFormat::Toml)),
        )
        .expect("config should deserialize")
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database.url.is_none());
        assert!(config.github.token.is_none());
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.fetch.limit, 100);
        assert_eq!(config.fetch.language, "Python");
        assert_eq!(config.fetch.min_stars, 500);
        assert_eq!(config.fetch.per_page, 50);
        assert_eq!(config.fetch.clone_dir, PathBuf::from("projects"));
        assert!((config.fetch.english_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.analyze.radon, "radon");
        assert_eq!(config.analyze.analysis_dir, PathBuf::from("Analysis"));
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = from_toml(
            r#"
            [github]
            token = "ghp_test123"

            [fetch]
            min_stars = 2000
            clone_dir = "/srv/checkouts"
        "#,
        );

        assert_eq!(config.github_token(), Some("ghp_test123".to_string()));
        assert_eq!(config.github.api_url, DEFAULT_API_URL);
        assert_eq!(config.fetch.min_stars, 2000);
        assert_eq!(config.fetch.limit, 100);
        assert_eq!(config.fetch.clone_dir, PathBuf::from("/srv/checkouts"));
    }

    #[test]
    fn test_empty_builder_gives_defaults() {
        let config = Config::from_builder(ConfigBuilder::builder()).expect("deserialize");
        assert_eq!(config.analyze.projects_dir, PathBuf::from("projects"));
        assert_eq!(config.analyze.multimetric, "multimetric");
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let config = from_toml(
            r#"
            [github]
            token = ""
        "#,
        );
        assert!(config.github_token().is_none());
    }

    #[test]
    fn test_later_sources_override_earlier() {
        let config = Config::from_builder(
            ConfigBuilder::builder()
                .add_source(File::from_str(
                    "[fetch]\nlimit = 10\nlanguage = \"Go\"",
                    FileFormat::Toml,
                ))
                .add_source(File::from_str("[fetch]\nlimit = 25", FileFormat::Toml)),
        )
        .expect("deserialize");

        assert_eq!(config.fetch.limit, 25);
        assert_eq!(config.fetch.language, "Go");
    }

    #[test]
    fn test_explicit_database_url_wins() {
        let config = from_toml(
            r#"
            [database]
            url = "sqlite:///tmp/metrics.db"
        "#,
        );
        assert_eq!(
            config.database_url(),
            Some("sqlite:///tmp/metrics.db".to_string())
        );
    }

    #[test]
    fn test_default_database_url_is_sqlite_in_state_dir() {
        let Some(url) = Config::default().database_url() else {
            return;
        };
        assert!(url.starts_with("sqlite://"));
        assert!(url.contains("repometrics.db"));
        assert!(url.ends_with("?mode=rwc"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = ConfigBuilder::builder()
            .add_source(File::from_str("[fetch\nlimit = 1", FileFormat::Toml))
            .build();
        assert!(result.is_err());
    }
}
