//! Radon output documents and their normalization into per-file rows.
//!
//! Each radon subcommand prints one JSON object keyed by file path:
//!
//! - `cc`: a list of blocks (`{"type", "name", "complexity", ...}`) or
//!   `{"error": "..."}` when the file could not be parsed
//! - `mi`: `{"mi": <float>, "rank": "A"}`
//! - `raw`: `{"loc", "lloc", "sloc", "comments", "multi", "blank", "single_comments"}`
//! - `hal`: `{"total": {...} | [...], "functions": ...}`
//!
//! Anything missing or of the wrong type reads as zero.

use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use crate::tool::ToolFailure;

pub const CYCLOMATIC_COMPLEXITY: &str = "cyclomatic_complexity";
pub const MAINTAINABILITY_INDEX: &str = "maintainability_index";
pub const LINES_OF_CODE: &str = "lines_of_code";
pub const COMMENT_LINES: &str = "comment_lines";
pub const FUNCTIONS: &str = "functions";
pub const SOURCE_LINES: &str = "source_lines";
pub const LOGICAL_LINES: &str = "logical_lines";
pub const BLANK_LINES: &str = "blank_lines";
pub const HALSTEAD_VOLUME: &str = "halstead_volume";
pub const HALSTEAD_DIFFICULTY: &str = "halstead_difficulty";
pub const HALSTEAD_EFFORT: &str = "halstead_effort";
pub const HALSTEAD_BUGS: &str = "halstead_bugs";
pub const HALSTEAD_TIME: &str = "halstead_time";

/// Positions in radon's list form of the Halstead report:
/// `[h1, h2, N1, N2, vocabulary, length, calculated_length, volume,
/// difficulty, effort, time, bugs]`.
const HALSTEAD_LIST_FIELDS: [(&str, usize); 5] = [
    ("volume", 7),
    ("difficulty", 8),
    ("effort", 9),
    ("time", 10),
    ("bugs", 11),
];

/// A tool invocation that produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    /// Tool and subcommand, e.g. `radon cc`.
    pub tool: String,
    pub failure: ToolFailure,
}

/// The four radon documents for one project.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub complexity: Map<String, JsonValue>,
    pub maintainability: Map<String, JsonValue>,
    pub raw_metrics: Map<String, JsonValue>,
    pub halstead: Map<String, JsonValue>,
    /// Invocations replaced by an empty document.
    pub failures: Vec<ToolError>,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.complexity.is_empty()
            && self.maintainability.is_empty()
            && self.raw_metrics.is_empty()
            && self.halstead.is_empty()
    }
}

/// One file's normalized results.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetrics {
    /// Path as reported by radon.
    pub path: String,
    /// Parent directory of `path`, `.` for a bare file name.
    pub directory: String,
    /// File name component of `path`.
    pub name: String,
    pub lines_of_code: i64,
    pub cyclomatic_complexity: f64,
    /// `(metric_name, value)` pairs, in a fixed order.
    pub metrics: Vec<(String, f64)>,
}

impl FileMetrics {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

/// Turn a report into one entry per file listed by `radon raw`.
pub fn normalize_report(report: &AnalysisReport) -> Vec<FileMetrics> {
    report
        .raw_metrics
        .iter()
        .map(|(path, raw)| normalize_file(report, path, raw))
        .collect()
}

fn normalize_file(report: &AnalysisReport, path: &str, raw: &JsonValue) -> FileMetrics {
    let blocks = report
        .complexity
        .get(path)
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let cyclomatic_complexity = blocks
        .first()
        .map(|block| number(block, "complexity"))
        .unwrap_or_default();
    let functions = blocks
        .iter()
        .filter(|block| {
            matches!(
                block.get("type").and_then(JsonValue::as_str),
                Some("function" | "method")
            )
        })
        .count();

    let maintainability = report
        .maintainability
        .get(path)
        .map(|mi| number(mi, "mi"))
        .unwrap_or_default();

    let lines_of_code = integer(raw, "loc");
    let halstead = report
        .halstead
        .get(path)
        .and_then(|h| h.get("total"))
        .unwrap_or(&JsonValue::Null);

    let metrics = vec![
        (CYCLOMATIC_COMPLEXITY, cyclomatic_complexity),
        (MAINTAINABILITY_INDEX, maintainability),
        (LINES_OF_CODE, lines_of_code as f64),
        (COMMENT_LINES, number(raw, "comments")),
        (FUNCTIONS, functions as f64),
        (SOURCE_LINES, number(raw, "sloc")),
        (LOGICAL_LINES, number(raw, "lloc")),
        (BLANK_LINES, number(raw, "blank")),
        (HALSTEAD_VOLUME, halstead_field(halstead, "volume")),
        (HALSTEAD_DIFFICULTY, halstead_field(halstead, "difficulty")),
        (HALSTEAD_EFFORT, halstead_field(halstead, "effort")),
        (HALSTEAD_BUGS, halstead_field(halstead, "bugs")),
        (HALSTEAD_TIME, halstead_field(halstead, "time")),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect();

    let file_path = Path::new(path);
    let directory = file_path
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| ".".to_string());
    let name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    FileMetrics {
        path: path.to_string(),
        directory,
        name,
        lines_of_code,
        cyclomatic_complexity,
        metrics,
    }
}

/// Numeric field of an object, 0 when absent or not a number.
fn number(value: &JsonValue, key: &str) -> f64 {
    value
        .get(key)
        .and_then(JsonValue::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or_default()
}

fn integer(value: &JsonValue, key: &str) -> i64 {
    value
        .get(key)
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or_default()
}

fn halstead_field(total: &JsonValue, key: &str) -> f64 {
    match total {
        JsonValue::Array(items) => HALSTEAD_LIST_FIELDS
            .iter()
            .find(|(name, _)| *name == key)
            .and_then(|(_, idx)| items.get(*idx))
            .and_then(JsonValue::as_f64)
            .unwrap_or_default(),
        other => number(other, key),
    }
}
