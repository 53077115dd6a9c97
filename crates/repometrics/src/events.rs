//! Progress reporting types for the ingestion pipelines.
//!
//! Pipelines emit [`PipelineEvent`]s through an optional callback so the
//! CLI can render them as progress bars or log records.

/// Progress events emitted by the fetch, analyze and multimetric pipelines.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum PipelineEvent {
    // ─── Fetch ───────────────────────────────────────────────────────────────
    /// Starting a search run.
    FetchStarted {
        /// Rendered search query.
        query: String,
        /// Number of pages that will be requested at most.
        pages: u32,
        /// Maximum number of repositories examined.
        limit: usize,
    },

    /// A page of search results arrived.
    FetchedPage {
        /// Page number (1-indexed).
        page: u32,
        /// Number of repositories on this page.
        count: usize,
        /// Total matches reported by the API.
        total_count: u64,
    },

    /// A repository was skipped before cloning.
    RepoSkipped {
        /// `owner/name`.
        full_name: String,
        /// Why it was skipped.
        reason: SkipReason,
    },

    /// A repository was cloned (or its checkout already existed).
    RepoCloned {
        /// `owner/name`.
        full_name: String,
        /// True if the checkout was already present.
        already_present: bool,
    },

    /// Cloning failed; the repository is not stored.
    CloneFailed {
        /// `owner/name`.
        full_name: String,
        /// Error message.
        error: String,
    },

    /// Repository metadata was stored.
    RepoStored {
        /// `owner/name`.
        full_name: String,
    },

    /// A page transaction was committed.
    PageCommitted {
        /// Page number (1-indexed).
        page: u32,
        /// Number of repositories stored from this page.
        stored: usize,
    },

    /// The search API answered with an error; no further pages are requested.
    FetchAborted {
        /// Page that failed.
        page: u32,
        /// Error message.
        error: String,
    },

    /// Fetch run finished.
    FetchComplete {
        /// Repositories stored over the run.
        stored: usize,
        /// Repositories examined over the run.
        examined: usize,
    },

    // ─── Analyze ─────────────────────────────────────────────────────────────
    /// Starting analysis of a projects directory.
    AnalyzeStarted {
        /// Number of project directories found.
        projects: usize,
    },

    /// Running the analyzers on one project.
    AnalyzingProject {
        /// Project directory name.
        name: String,
    },

    /// An analyzer invocation failed and was replaced by an empty result.
    ToolFailed {
        /// Project directory name.
        project: String,
        /// Tool and subcommand, e.g. `radon cc`.
        tool: String,
        /// Error message.
        error: String,
    },

    /// Metrics for a project were saved.
    ProjectSaved {
        /// Project directory name.
        name: String,
        /// Number of files written.
        files: usize,
    },

    /// Python files of a project were copied into its analysis directory.
    ProjectStaged {
        /// Project directory name.
        name: String,
        /// Number of files copied.
        files: usize,
    },

    /// The project was not saved: no matching repository row, or nothing to analyze.
    ProjectSkipped {
        /// Project directory name.
        name: String,
    },

    /// Analysis run finished.
    AnalyzeComplete {
        /// Projects saved.
        analyzed: usize,
        /// Projects skipped.
        skipped: usize,
    },

    /// Non-fatal problem worth surfacing.
    Warning {
        /// Warning message.
        message: String,
    },
}

/// Why a search result was not cloned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Description failed the English heuristic.
    NonEnglish,
    /// A row with the same GitHub ID or full name already exists.
    Duplicate,
}

impl SkipReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::NonEnglish => "non-english description",
            SkipReason::Duplicate => "already stored",
        }
    }
}

/// Callback for progress updates during pipeline runs.
pub type ProgressCallback = Box<dyn Fn(PipelineEvent) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: PipelineEvent) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
