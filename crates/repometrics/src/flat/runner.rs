use std::path::PathBuf;

use async_trait::async_trait;

use super::report::FlatReport;
use crate::analyze::ToolError;
use crate::tool::{ToolOutput, run_tool};

/// Produces a multimetric report for a set of staged files.
#[async_trait]
pub trait FlatAnalyzer: Send + Sync {
    async fn analyze(&self, files: &[PathBuf]) -> FlatReport;
}

/// Runs `multimetric <files...>`.
#[derive(Debug, Clone)]
pub struct MultimetricRunner {
    program: String,
}

impl Default for MultimetricRunner {
    fn default() -> Self {
        Self::new("multimetric")
    }
}

impl MultimetricRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.program
    }

    /// Parse captured output; anything unusable becomes an empty report.
    pub fn report_from_output(&self, output: &ToolOutput) -> FlatReport {
        match output.json_object() {
            Ok(doc) => FlatReport::from_document(&doc),
            Err(failure) => FlatReport::failed(ToolError {
                tool: self.program.clone(),
                failure,
            }),
        }
    }
}

#[async_trait]
impl FlatAnalyzer for MultimetricRunner {
    async fn analyze(&self, files: &[PathBuf]) -> FlatReport {
        let output = run_tool(&self.program, files.iter().map(PathBuf::as_path)).await;
        self.report_from_output(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolFailure;

    #[test]
    fn parses_successful_output() {
        let runner = MultimetricRunner::default();
        let output = ToolOutput::completed(
            r#"{"files": {"a.py": {"loc": 4}}, "overall": {"loc": 4}, "stats": {}}"#.to_string(),
            String::new(),
            Some(0),
        );

        let report = runner.report_from_output(&output);
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.overall.lines_of_code, 4);
        assert!(report.failure.is_none());
    }

    #[test]
    fn garbage_output_is_an_empty_report() {
        let runner = MultimetricRunner::new("mm");
        let output = ToolOutput::completed("not json".to_string(), String::new(), Some(0));

        let report = runner.report_from_output(&output);
        assert!(report.files.is_empty());
        let failure = report.failure.expect("failure recorded");
        assert_eq!(failure.tool, "mm");
        assert!(matches!(failure.failure, ToolFailure::MalformedJson(_)));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_failure() {
        let runner = MultimetricRunner::new("repometrics-missing-multimetric");
        let report = runner.analyze(&[PathBuf::from("a.py")]).await;
        assert!(matches!(
            report.failure.map(|f| f.failure),
            Some(ToolFailure::Spawn(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn multimetric_receives_every_staged_file() {
        use crate::tool::fake_tool;

        let tools = tempfile::tempdir().expect("tempdir");
        let (program, log) = fake_tool::install(
            tools.path(),
            "multimetric",
            r#"printf '{"files": {}, "overall": {"loc": 3}, "stats": {}}'"#,
        );
        let runner = MultimetricRunner::new(program);
        let files = vec![
            PathBuf::from("Analysis/flask_analysis/app.py"),
            PathBuf::from("Analysis/flask_analysis/cli.py"),
        ];

        let report = runner.analyze(&files).await;
        assert!(report.failure.is_none());
        assert_eq!(report.overall.lines_of_code, 3);
        assert_eq!(
            fake_tool::recorded_args(&log),
            vec![
                "Analysis/flask_analysis/app.py".to_string(),
                "Analysis/flask_analysis/cli.py".to_string(),
            ]
        );
    }
}
