//! Running external analysis tools as subprocesses.
//!
//! Analyzers (`radon`, `multimetric`, `git`) are spawned through
//! [`run_tool`], which captures stdout and stderr. [`ToolOutput::json_object`]
//! turns the captured stdout into a JSON object or a typed [`ToolFailure`]
//! that callers log before substituting an empty result.

use std::ffi::OsStr;
use std::process::Stdio;

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Whether the process spawned and exited with status 0.
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    /// Exit code, if the process exited normally.
    pub return_code: Option<i32>,
    /// Spawn error, if the process never ran.
    pub error: Option<String>,
}

/// Why a tool invocation produced no usable JSON.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolFailure {
    #[error("failed to run: {0}")]
    Spawn(String),

    #[error("exited with status {code:?}: {stderr}")]
    ExitStatus { code: Option<i32>, stderr: String },

    #[error("produced no output")]
    EmptyOutput,

    #[error("produced malformed JSON: {0}")]
    MalformedJson(String),

    #[error("produced JSON that is not an object")]
    NotAnObject,
}

impl ToolOutput {
    /// Create a result for a process that ran to completion.
    pub fn completed(stdout: String, stderr: String, return_code: Option<i32>) -> Self {
        Self {
            success: return_code == Some(0),
            stdout,
            stderr,
            return_code,
            error: None,
        }
    }

    /// Create a result for a process that could not be spawned.
    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            return_code: None,
            error: Some(error),
        }
    }

    /// Parse stdout as a JSON object.
    pub fn json_object(&self) -> Result<Map<String, JsonValue>, ToolFailure> {
        if let Some(error) = &self.error {
            return Err(ToolFailure::Spawn(error.clone()));
        }
        if !self.success {
            return Err(ToolFailure::ExitStatus {
                code: self.return_code,
                stderr: first_line(&self.stderr),
            });
        }
        if self.stdout.trim().is_empty() {
            return Err(ToolFailure::EmptyOutput);
        }
        match serde_json::from_str::<JsonValue>(&self.stdout) {
            Ok(JsonValue::Object(map)) => Ok(map),
            Ok(_) => Err(ToolFailure::NotAnObject),
            Err(e) => Err(ToolFailure::MalformedJson(e.to_string())),
        }
    }
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Run `program` with `args`, waiting for it to exit.
///
/// Never fails: a spawn error is reported through [`ToolOutput::error`].
pub async fn run_tool<I, S>(program: &str, args: I) -> ToolOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(program, "running external tool");

    match command.output().await {
        Ok(output) => ToolOutput::completed(
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
            output.status.code(),
        ),
        Err(e) => ToolOutput::failure(format!("{program}: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_object_parses_successful_output() {
        let out = ToolOutput::completed(r#"{"a.py": {"mi": 71.2}}"#.to_string(), String::new(), Some(0));
        let map = out.json_object().expect("object");
        assert!(map.contains_key("a.py"));
    }

    #[test]
    fn json_object_reports_each_failure_kind() {
        let spawn = ToolOutput::failure("radon: No such file or directory".to_string());
        assert!(matches!(spawn.json_object(), Err(ToolFailure::Spawn(_))));

        let status = ToolOutput::completed(
            "{}".to_string(),
            "\nTraceback (most recent call last):\n  ...".to_string(),
            Some(2),
        );
        assert_eq!(
            status.json_object(),
            Err(ToolFailure::ExitStatus {
                code: Some(2),
                stderr: "Traceback (most recent call last):".to_string(),
            })
        );

        let empty = ToolOutput::completed("  \n".to_string(), String::new(), Some(0));
        assert_eq!(empty.json_object(), Err(ToolFailure::EmptyOutput));

        let malformed = ToolOutput::completed("{not json".to_string(), String::new(), Some(0));
        assert!(matches!(
            malformed.json_object(),
            Err(ToolFailure::MalformedJson(_))
        ));

        let array = ToolOutput::completed("[1, 2]".to_string(), String::new(), Some(0));
        assert_eq!(array.json_object(), Err(ToolFailure::NotAnObject));
    }

    #[tokio::test]
    async fn run_tool_reports_missing_program() {
        let out = run_tool("repometrics-no-such-tool", ["--version"]).await;
        assert!(!out.success);
        assert!(out.error.is_some());
        assert!(matches!(out.json_object(), Err(ToolFailure::Spawn(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_tool_captures_stdout_and_exit_code() {
        let ok = run_tool("sh", ["-c", "printf '{\"x\": 1}'"]).await;
        assert!(ok.success);
        assert_eq!(ok.return_code, Some(0));
        assert_eq!(ok.json_object().expect("object")["x"], 1);

        let failed = run_tool("sh", ["-c", "echo boom >&2; exit 3"]).await;
        assert!(!failed.success);
        assert_eq!(failed.return_code, Some(3));
        assert_eq!(failed.stderr.trim(), "boom");
    }
}
