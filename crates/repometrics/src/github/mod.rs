//! GitHub search API client.
//!
//! # Module Structure
//!
//! - [`error`] - Error types for GitHub API operations
//! - [`types`] - Search query, result items and rate limit payloads
//! - [`client`] - The HTTP client
//! - [`convert`] - Conversion of search results to repository rows

mod client;
mod convert;
mod error;
mod types;

pub use client::{DEFAULT_API_URL, GitHubClient};
pub use convert::to_active_model;
pub use error::{GitHubError, short_error_message};
pub use types::{
    DEFAULT_PER_PAGE, GitHubRateLimitResponse, GitHubRateLimits, RateLimitResource, SearchPage,
    SearchQuery, SearchRepo,
};
