use std::sync::Mutex;
use std::time::Duration;

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use repometrics::PipelineEvent;

/// Interactive progress reporter using indicatif.
///
/// One bar per phase: fetch counts examined search results against the
/// limit, analyze counts project directories. Skips and failures are printed
/// above the bar.
pub struct InteractiveReporter {
    multi: MultiProgress,
    bar: Mutex<Option<ProgressBar>>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bar: Mutex::new(None),
        }
    }

    /// A reporter that draws nothing.
    #[cfg(test)]
    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden()),
            bar: Mutex::new(None),
        }
    }

    fn start_bar(&self, slot: &mut Option<ProgressBar>, prefix: &str, len: u64, msg: String) {
        if let Some(previous) = slot.take()
            && !previous.is_finished()
        {
            previous.finish();
        }
        let bar = self.multi.add(ProgressBar::new(len));
        bar.set_style(Self::bar_style());
        bar.set_prefix(format!("{:10}", prefix));
        bar.set_message(msg);
        bar.enable_steady_tick(Duration::from_millis(100));
        *slot = Some(bar);
    }

    fn line(&self, text: String) {
        self.multi.println(text).ok();
    }

    pub fn handle(&self, event: PipelineEvent) {
        let mut slot = self.bar.lock().unwrap_or_else(|e| e.into_inner());
        let inc = |slot: &Option<ProgressBar>| {
            if let Some(bar) = slot {
                bar.inc(1);
            }
        };

        match event {
            PipelineEvent::FetchStarted { query, limit, .. } => {
                self.start_bar(&mut slot, "Fetching", limit as u64, query);
            }
            PipelineEvent::FetchedPage {
                page, total_count, ..
            } => {
                if let Some(bar) = slot.as_ref() {
                    bar.set_message(format!("page {} of {} matches", page, total_count));
                }
            }
            PipelineEvent::RepoSkipped { full_name, reason } => {
                inc(&slot);
                self.line(format!(
                    "{} {} ({})",
                    style("skip").dim(),
                    full_name,
                    reason.as_str()
                ));
            }
            PipelineEvent::RepoCloned {
                full_name,
                already_present,
            } => {
                if let Some(bar) = slot.as_ref() {
                    let verb = if already_present { "present" } else { "cloned" };
                    bar.set_message(format!("{} {}", verb, full_name));
                }
            }
            PipelineEvent::CloneFailed { full_name, error } => {
                inc(&slot);
                self.line(format!("{} {}: {}", style("✗").red(), full_name, error));
            }
            PipelineEvent::RepoStored { .. } => inc(&slot),
            PipelineEvent::FetchAborted { page, error } => {
                self.line(format!(
                    "{} search stopped at page {}: {}",
                    style("!").yellow(),
                    page,
                    error
                ));
            }
            PipelineEvent::FetchComplete { stored, examined } => {
                if let Some(bar) = slot.take() {
                    bar.finish_with_message(format!("✓ stored {} of {}", stored, examined));
                }
            }
            PipelineEvent::AnalyzeStarted { projects } => {
                self.start_bar(&mut slot, "Analyzing", projects as u64, String::new());
            }
            PipelineEvent::AnalyzingProject { name } => {
                if let Some(bar) = slot.as_ref() {
                    bar.set_message(name);
                }
            }
            PipelineEvent::ProjectStaged { name, files } => {
                if let Some(bar) = slot.as_ref() {
                    bar.set_message(format!("{} ({} files staged)", name, files));
                }
            }
            PipelineEvent::ToolFailed {
                project,
                tool,
                error,
            } => {
                self.line(format!(
                    "{} {} on {}: {}",
                    style("!").yellow(),
                    tool,
                    project,
                    error
                ));
            }
            PipelineEvent::ProjectSaved { .. } => inc(&slot),
            PipelineEvent::ProjectSkipped { name } => {
                inc(&slot);
                self.line(format!("{} {}", style("skip").dim(), name));
            }
            PipelineEvent::AnalyzeComplete { analyzed, skipped } => {
                if let Some(bar) = slot.take() {
                    bar.finish_with_message(format!(
                        "✓ {} analyzed, {} skipped",
                        analyzed, skipped
                    ));
                }
            }
            PipelineEvent::Warning { message } => {
                self.line(format!("{} {}", style("!").yellow(), message));
            }
            _ => {}
        }
    }

    pub fn finish(&self) {
        let mut slot = self.bar.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bar) = slot.take()
            && !bar.is_finished()
        {
            bar.finish();
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}
