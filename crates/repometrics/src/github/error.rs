//! GitHub API error types.

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur when interacting with the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with a non-success status.
    #[error("GitHub API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The configured API base URL could not be parsed.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl GitHubError {
    /// True for 403/429, which GitHub uses when the search quota is spent.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GitHubError::Status { status: 403 | 429, .. })
    }
}

/// Get a short error message suitable for display: the first line of the error.
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

/// Extract the API's `message` field from an error body, falling back to the raw text.
pub(crate) fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            if text.chars().count() > 200 {
                let truncated: String = text.chars().take(197).collect();
                format!("{truncated}...")
            } else {
                text.to_string()
            }
        })
}
