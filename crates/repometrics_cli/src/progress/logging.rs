use repometrics::PipelineEvent;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::FetchStarted {
                query,
                pages,
                limit,
            } => {
                tracing::info!(query = %query, pages, limit, "Searching repositories");
            }

            PipelineEvent::FetchedPage {
                page,
                count,
                total_count,
            } => {
                tracing::debug!(page, count, total_count, "Fetched page");
            }

            PipelineEvent::RepoSkipped { full_name, reason } => {
                tracing::debug!(repo = %full_name, reason = reason.as_str(), "Skipped");
            }

            PipelineEvent::RepoCloned {
                full_name,
                already_present,
            } => {
                if already_present {
                    tracing::debug!(repo = %full_name, "Checkout already present");
                } else {
                    tracing::info!(repo = %full_name, "Cloned");
                }
            }

            PipelineEvent::CloneFailed { full_name, error } => {
                tracing::warn!(repo = %full_name, error = %error, "Clone failed");
            }

            PipelineEvent::RepoStored { full_name } => {
                tracing::debug!(repo = %full_name, "Saved to database");
            }

            PipelineEvent::PageCommitted { page, stored } => {
                tracing::info!(page, stored, "Page committed");
            }

            PipelineEvent::FetchAborted { page, error } => {
                tracing::error!(page, error = %error, "Search failed, stopping");
            }

            PipelineEvent::FetchComplete { stored, examined } => {
                tracing::info!(stored, examined, "Fetch complete");
            }

            PipelineEvent::AnalyzeStarted { projects } => {
                tracing::info!(projects, "Analyzing projects");
            }

            PipelineEvent::AnalyzingProject { name } => {
                tracing::debug!(project = %name, "Analyzing");
            }

            PipelineEvent::ProjectStaged { name, files } => {
                tracing::debug!(project = %name, files, "Staged python files");
            }

            PipelineEvent::ToolFailed {
                project,
                tool,
                error,
            } => {
                tracing::warn!(project = %project, tool = %tool, error = %error, "Tool failed");
            }

            PipelineEvent::ProjectSaved { name, files } => {
                tracing::info!(project = %name, files, "Saved");
            }

            PipelineEvent::ProjectSkipped { name } => {
                tracing::info!(project = %name, "Skipped");
            }

            PipelineEvent::AnalyzeComplete { analyzed, skipped } => {
                tracing::info!(analyzed, skipped, "Analysis complete");
            }

            PipelineEvent::Warning { message } => {
                tracing::warn!(message = %message, "Warning");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
