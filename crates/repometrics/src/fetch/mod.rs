//! Fetch pipeline: search, filter, clone, store.
//!
//! [`fetch_repositories`] walks search result pages in order. Each item is
//! checked against the English heuristic and against rows already stored,
//! cloned, and then inserted. Every page is written in its own transaction,
//! so an API failure on a later page keeps everything committed before it.

mod clone;
mod language;

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tracing::{debug, info, warn};

pub use clone::{CloneError, CloneOutcome, Cloner, GitCloner};
pub use language::{DEFAULT_ENGLISH_THRESHOLD, is_mostly_english};

use crate::error::PipelineError;
use crate::events::{PipelineEvent, ProgressCallback, SkipReason, emit};
use crate::github::{GitHubClient, SearchQuery, short_error_message, to_active_model};
use crate::store::repositories;

/// GitHub never returns more than this many results per page.
const MAX_PER_PAGE: u32 = 100;

/// Options for a fetch run.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub query: SearchQuery,
    /// Maximum number of search results examined over the run.
    pub limit: usize,
    pub english_threshold: f64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            query: SearchQuery::default(),
            limit: 100,
            english_threshold: DEFAULT_ENGLISH_THRESHOLD,
        }
    }
}

impl FetchOptions {
    /// Effective page size, clamped to what the API accepts.
    pub fn per_page(&self) -> u32 {
        self.query.per_page.clamp(1, MAX_PER_PAGE)
    }

    /// Number of pages needed to examine `limit` results.
    pub fn page_count(&self) -> u32 {
        let pages = self.limit.div_ceil(self.per_page() as usize);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// Outcome of a fetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchSummary {
    /// Pages received from the API.
    pub pages: u32,
    /// Search results looked at.
    pub examined: usize,
    /// Repositories cloned and inserted.
    pub stored: usize,
    pub skipped_non_english: usize,
    pub skipped_duplicate: usize,
    pub clone_failures: usize,
    /// True if the API answered with an error and the run stopped early.
    pub aborted: bool,
}

/// Search, clone and store up to `options.limit` repositories.
///
/// # Errors
/// Only database failures are returned. API errors end the run with
/// `aborted = true`; clone failures skip the repository.
pub async fn fetch_repositories(
    db: &DatabaseConnection,
    client: &GitHubClient,
    cloner: &dyn Cloner,
    options: &FetchOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<FetchSummary, PipelineError> {
    let mut query = options.query.clone();
    query.per_page = options.per_page();
    let pages = options.page_count();
    let mut summary = FetchSummary::default();

    emit(
        on_progress,
        PipelineEvent::FetchStarted {
            query: query.render(),
            pages,
            limit: options.limit,
        },
    );
    info!(query = %query.render(), pages, limit = options.limit, "starting fetch");
    if !client.is_authenticated() {
        warn!("no GitHub token configured, search requests are unauthenticated");
        emit(
            on_progress,
            PipelineEvent::Warning {
                message: "No GitHub token configured; search requests are unauthenticated"
                    .to_string(),
            },
        );
    }

    for page in 1..=pages {
        let result = match client.search_page(&query, page).await {
            Ok(result) => result,
            Err(e) => {
                warn!(page, error = %e, "search request failed, stopping");
                let error = if e.is_rate_limited() {
                    format!("search rate limit exhausted: {}", short_error_message(&e))
                } else {
                    short_error_message(&e)
                };
                emit(on_progress, PipelineEvent::FetchAborted { page, error });
                summary.aborted = true;
                break;
            }
        };

        summary.pages += 1;
        emit(
            on_progress,
            PipelineEvent::FetchedPage {
                page,
                count: result.items.len(),
                total_count: result.total_count,
            },
        );

        if result.items.is_empty() {
            debug!(page, "empty page, no more results");
            break;
        }

        let txn = db.begin().await?;
        let mut stored_on_page = 0;

        for item in &result.items {
            if summary.examined >= options.limit {
                break;
            }
            summary.examined += 1;

            if !is_mostly_english(item.description.as_deref(), options.english_threshold) {
                debug!(repo = %item.full_name, "description is not mostly English");
                summary.skipped_non_english += 1;
                emit(
                    on_progress,
                    PipelineEvent::RepoSkipped {
                        full_name: item.full_name.clone(),
                        reason: SkipReason::NonEnglish,
                    },
                );
                continue;
            }

            if repositories::exists(&txn, item.id, &item.full_name).await? {
                debug!(repo = %item.full_name, "already stored");
                summary.skipped_duplicate += 1;
                emit(
                    on_progress,
                    PipelineEvent::RepoSkipped {
                        full_name: item.full_name.clone(),
                        reason: SkipReason::Duplicate,
                    },
                );
                continue;
            }

            let outcome = match cloner.clone_repo(&item.clone_url, &item.name).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(repo = %item.full_name, error = %e, "clone failed, skipping");
                    summary.clone_failures += 1;
                    emit(
                        on_progress,
                        PipelineEvent::CloneFailed {
                            full_name: item.full_name.clone(),
                            error: e.to_string(),
                        },
                    );
                    continue;
                }
            };
            emit(
                on_progress,
                PipelineEvent::RepoCloned {
                    full_name: item.full_name.clone(),
                    already_present: outcome.already_present(),
                },
            );

            repositories::insert(&txn, to_active_model(item)).await?;
            stored_on_page += 1;
            emit(
                on_progress,
                PipelineEvent::RepoStored {
                    full_name: item.full_name.clone(),
                },
            );
        }

        txn.commit().await?;
        summary.stored += stored_on_page;
        emit(
            on_progress,
            PipelineEvent::PageCommitted {
                page,
                stored: stored_on_page,
            },
        );

        if summary.examined >= options.limit {
            break;
        }
    }

    info!(
        stored = summary.stored,
        examined = summary.examined,
        aborted = summary.aborted,
        "fetch finished"
    );
    emit(
        on_progress,
        PipelineEvent::FetchComplete {
            stored: summary.stored,
            examined: summary.examined,
        },
    );

    Ok(summary)
}
