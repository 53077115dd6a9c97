//! GitHub API data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default results per search page.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// Search parameters for `/search/repositories`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Primary language filter, e.g. `Python`.
    pub language: String,
    /// Only repositories with strictly more stars than this.
    pub min_stars: u32,
    /// Add `fork:false` to the query.
    pub exclude_forks: bool,
    /// Sort key; results are always ordered descending.
    pub sort: String,
    /// Results per page (GitHub caps this at 100).
    pub per_page: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            language: "Python".to_string(),
            min_stars: 500,
            exclude_forks: true,
            sort: "stars".to_string(),
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl SearchQuery {
    /// Render the `q` parameter.
    pub fn render(&self) -> String {
        let mut q = format!("language:{} stars:>{}", self.language, self.min_stars);
        if self.exclude_forks {
            q.push_str(" fork:false");
        }
        q
    }
}

/// One page of search results.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<SearchRepo>,
}

/// A repository item as returned by the search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRepo {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub clone_url: String,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single rate limit resource entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResource {
    /// Maximum requests allowed per period.
    pub limit: usize,
    /// Requests used in current period.
    pub used: usize,
    /// Remaining requests in current period.
    pub remaining: usize,
    /// Unix timestamp when the rate limit resets.
    pub reset: u64,
}

impl RateLimitResource {
    /// Get the reset time as a DateTime.
    pub fn reset_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.reset as i64, 0).unwrap_or_else(Utc::now)
    }
}

/// The rate limit resources relevant to ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRateLimits {
    /// Core API rate limit (non-search REST endpoints).
    pub core: RateLimitResource,
    /// Search API rate limit.
    pub search: RateLimitResource,
}

/// Rate limit response from `/rate_limit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRateLimitResponse {
    pub resources: GitHubRateLimits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_matches_popular_python_search() {
        let query = SearchQuery::default();
        assert_eq!(query.render(), "language:Python stars:>500 fork:false");
        assert_eq!(query.per_page, 50);
    }

    #[test]
    fn query_without_fork_filter() {
        let query = SearchQuery {
            language: "Rust".to_string(),
            min_stars: 10,
            exclude_forks: false,
            ..SearchQuery::default()
        };
        assert_eq!(query.render(), "language:Rust stars:>10");
    }

    #[test]
    fn search_page_deserializes_items_with_missing_optionals() {
        let json = r#"{
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {
                    "id": 1362490,
                    "name": "requests",
                    "full_name": "psf/requests",
                    "clone_url": "https://github.com/psf/requests.git",
                    "stargazers_count": 52000,
                    "forks_count": 9300,
                    "language": "Python",
                    "description": "A simple, yet elegant, HTTP library.",
                    "fork": false,
                    "created_at": "2011-02-13T18:38:17Z",
                    "updated_at": "2025-01-01T00:00:00Z"
                },
                {
                    "id": 2,
                    "name": "bare",
                    "full_name": "someone/bare",
                    "clone_url": "https://github.com/someone/bare.git",
                    "description": null
                }
            ]
        }"#;

        let page: SearchPage = serde_json::from_str(json).expect("page should parse");
        assert_eq!(page.total_count, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].full_name, "psf/requests");
        assert_eq!(page.items[0].stargazers_count, 52000);
        assert!(page.items[0].created_at.is_some());
        assert_eq!(page.items[1].description, None);
        assert_eq!(page.items[1].stargazers_count, 0);
        assert!(!page.items[1].fork);
    }

    #[test]
    fn rate_limit_response_parses_core_and_search() {
        let json = r#"{
            "resources": {
                "core": {"limit": 5000, "used": 100, "remaining": 4900, "reset": 1700000000},
                "search": {"limit": 30, "used": 5, "remaining": 25, "reset": 2000000000},
                "graphql": {"limit": 5000, "used": 0, "remaining": 5000, "reset": 1700000000}
            },
            "rate": {"limit": 5000, "used": 100, "remaining": 4900, "reset": 1700000000}
        }"#;

        let response: GitHubRateLimitResponse =
            serde_json::from_str(json).expect("rate limit should parse");
        assert_eq!(response.resources.core.limit, 5000);
        assert_eq!(response.resources.search.remaining, 25);
        assert_eq!(response.resources.search.reset_at().timestamp(), 2000000000);
    }
}
