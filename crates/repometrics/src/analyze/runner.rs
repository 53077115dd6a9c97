use std::ffi::OsStr;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Map;

use super::report::{AnalysisReport, ToolError};
use crate::tool::{ToolOutput, run_tool};

/// Produces the raw analyzer documents for one project directory.
#[async_trait]
pub trait MetricsAnalyzer: Send + Sync {
    async fn analyze(&self, project: &Path) -> AnalysisReport;
}

/// The radon subcommands run per project, in report order.
pub const RADON_COMMANDS: [&str; 4] = ["cc", "mi", "raw", "hal"];

/// Runs `radon cc|mi|raw|hal -j <project>`.
#[derive(Debug, Clone)]
pub struct RadonAnalyzer {
    radon: String,
}

impl Default for RadonAnalyzer {
    fn default() -> Self {
        Self::new("radon")
    }
}

impl RadonAnalyzer {
    /// Use `radon` as the executable (a bare name is looked up on `PATH`).
    pub fn new(radon: impl Into<String>) -> Self {
        Self {
            radon: radon.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.radon
    }

    async fn run(&self, subcommand: &str, project: &Path) -> ToolOutput {
        let args = [OsStr::new(subcommand), OsStr::new("-j"), project.as_os_str()];
        run_tool(&self.radon, args).await
    }

    /// Assemble a report from the four outputs, in [`RADON_COMMANDS`] order.
    ///
    /// Unusable output becomes an empty document plus a recorded failure.
    pub fn report_from_outputs(&self, outputs: [ToolOutput; 4]) -> AnalysisReport {
        let mut failures = Vec::new();
        let [cc, mi, raw, hal] = outputs;
        let mut parse = |subcommand: &str, output: ToolOutput| match output.json_object() {
            Ok(map) => map,
            Err(failure) => {
                failures.push(ToolError {
                    tool: format!("{} {subcommand}", self.radon),
                    failure,
                });
                Map::new()
            }
        };

        let complexity = parse(RADON_COMMANDS[0], cc);
        let maintainability = parse(RADON_COMMANDS[1], mi);
        let raw_metrics = parse(RADON_COMMANDS[2], raw);
        let halstead = parse(RADON_COMMANDS[3], hal);

        AnalysisReport {
            complexity,
            maintainability,
            raw_metrics,
            halstead,
            failures,
        }
    }
}

#[async_trait]
impl MetricsAnalyzer for RadonAnalyzer {
    async fn analyze(&self, project: &Path) -> AnalysisReport {
        let [cc, mi, raw, hal] = RADON_COMMANDS;
        let outputs = [
            self.run(cc, project).await,
            self.run(mi, project).await,
            self.run(raw, project).await,
            self.run(hal, project).await,
        ];
        self.report_from_outputs(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolFailure;

    fn ok(stdout: &str) -> ToolOutput {
        ToolOutput::completed(stdout.to_string(), String::new(), Some(0))
    }

    #[test]
    fn outputs_are_parsed_in_order() {
        let analyzer = RadonAnalyzer::default();
        let report = analyzer.report_from_outputs([
            ok(r#"{"p/a.py": [{"type": "function", "name": "f", "complexity": 3}]}"#),
            ok(r#"{"p/a.py": {"mi": 70.5, "rank": "A"}}"#),
            ok(r#"{"p/a.py": {"loc": 10, "comments": 2}}"#),
            ok(r#"{"p/a.py": {"total": {"volume": 12.0}}}"#),
        ]);

        assert!(report.failures.is_empty());
        assert!(report.complexity.contains_key("p/a.py"));
        assert_eq!(report.maintainability["p/a.py"]["mi"], 70.5);
        assert_eq!(report.raw_metrics["p/a.py"]["loc"], 10);
        assert_eq!(report.halstead["p/a.py"]["total"]["volume"], 12.0);
    }

    #[test]
    fn bad_output_degrades_to_empty_document() {
        let analyzer = RadonAnalyzer::new("/opt/radon");
        let report = analyzer.report_from_outputs([
            ok("{}"),
            ok("Traceback: boom"),
            ToolOutput::completed(String::new(), "usage".to_string(), Some(2)),
            ok(r#"{"p/a.py": {}}"#),
        ]);

        assert!(report.maintainability.is_empty());
        assert!(report.raw_metrics.is_empty());
        assert_eq!(report.halstead.len(), 1);

        let tools: Vec<_> = report.failures.iter().map(|f| f.tool.as_str()).collect();
        assert_eq!(tools, vec!["/opt/radon mi", "/opt/radon raw"]);
        assert!(matches!(
            report.failures[1].failure,
            ToolFailure::ExitStatus { code: Some(2), .. }
        ));
    }

    #[tokio::test]
    async fn missing_radon_yields_empty_report_with_four_failures() {
        let dir = tempfile::tempdir().expect("tempdir");
        let analyzer = RadonAnalyzer::new("repometrics-missing-radon");

        let report = analyzer.analyze(dir.path()).await;

        assert!(report.is_empty());
        assert_eq!(report.failures.len(), 4);
        assert!(
            report
                .failures
                .iter()
                .all(|f| matches!(f.failure, ToolFailure::Spawn(_)))
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn radon_is_invoked_once_per_subcommand_with_json_output() {
        use crate::tool::fake_tool;

        let tools = tempfile::tempdir().expect("tempdir");
        let (radon, log) = fake_tool::install(tools.path(), "radon", "printf '{}'");
        let project = tempfile::tempdir().expect("tempdir");
        let analyzer = RadonAnalyzer::new(radon);

        let report = analyzer.analyze(project.path()).await;
        assert!(report.failures.is_empty());

        let path = project.path().display().to_string();
        let expected: Vec<String> = RADON_COMMANDS
            .iter()
            .flat_map(|sub| [sub.to_string(), "-j".to_string(), path.clone()])
            .collect();
        assert_eq!(fake_tool::recorded_args(&log), expected);
    }
}
