//! GitHub search client over the HTTP transport.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use super::error::{GitHubError, error_message};
use super::types::{
    GitHubRateLimitResponse, GitHubRateLimits, RateLimitResource, SearchPage, SearchQuery,
};
use crate::http::{HttpRequest, HttpTransport};

/// Public GitHub API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("repometrics/", env!("CARGO_PKG_VERSION"));

/// GitHub API client for repository search.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client.
    ///
    /// `api_url` is normalized by stripping trailing slashes. Without a token,
    /// requests are anonymous and subject to the much lower unauthenticated
    /// search quota.
    pub fn new(transport: Arc<dyn HttpTransport>, api_url: &str, token: Option<String>) -> Self {
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Get the API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Whether requests carry an `Authorization` header.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Build the URL for one page of a search.
    pub fn search_url(&self, query: &SearchQuery, page: u32) -> Result<String, GitHubError> {
        let mut url = Url::parse(&format!("{}/search/repositories", self.api_url))?;
        url.query_pairs_mut()
            .append_pair("q", &query.render())
            .append_pair("sort", &query.sort)
            .append_pair("order", "desc")
            .append_pair("per_page", &query.per_page.to_string())
            .append_pair("page", &page.to_string());
        Ok(url.into())
    }

    /// Fetch one page (1-indexed) of search results.
    pub async fn search_page(
        &self,
        query: &SearchQuery,
        page: u32,
    ) -> Result<SearchPage, GitHubError> {
        let url = self.search_url(query, page)?;
        self.get_json(url).await
    }

    /// Get rate limits for the core and search resources.
    pub async fn rate_limits(&self) -> Result<GitHubRateLimits, GitHubError> {
        let response: GitHubRateLimitResponse =
            self.get_json(format!("{}/rate_limit", self.api_url)).await?;
        Ok(response.resources)
    }

    /// Get the search rate limit, the one that bounds a fetch run.
    pub async fn rate_limit(&self) -> Result<RateLimitResource, GitHubError> {
        Ok(self.rate_limits().await?.search)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, GitHubError> {
        let mut request = HttpRequest::get(url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {token}"));
        }

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(GitHubError::Status {
                status: response.status,
                message: error_message(&response.body),
            });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }
}
