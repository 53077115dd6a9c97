//! Multimetric's JSON report.
//!
//! `multimetric a.py b.py` prints
//! `{"files": {path: {...}}, "overall": {...}, "stats": {"mean": {...}, "sd": {...}}}`
//! where every figure object carries the same keys (`loc`, `lang`,
//! `halstead_volume`, `tiobe_*`, ...). Only `files` and `overall` are stored;
//! `stats` is derived from them and ignored.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::analyze::ToolError;

/// The figures multimetric reports for a file or a whole project.
///
/// Fields mirror the flat schema columns. Absent or mistyped values read as
/// zero (or an empty language).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricValues {
    pub comment_ratio: f64,
    pub cyclomatic_complexity: i64,
    pub fanout_external: i64,
    pub fanout_internal: i64,
    pub halstead_bugprop: f64,
    pub halstead_difficulty: f64,
    pub halstead_effort: f64,
    pub halstead_timerequired: f64,
    pub halstead_volume: f64,
    /// `lang`, joined with `,` when multimetric lists several.
    pub programming_lang: String,
    /// `loc`.
    pub lines_of_code: i64,
    pub maintainability_index: f64,
    pub operands_sum: i64,
    pub operands_uniq: i64,
    pub operators_sum: i64,
    pub operators_uniq: i64,
    pub tiobe: f64,
    pub tiobe_compiler: f64,
    pub tiobe_complexity: f64,
    pub tiobe_coverage: f64,
    pub tiobe_duplication: f64,
    pub tiobe_fanout: f64,
    pub tiobe_functional: f64,
    pub tiobe_security: f64,
    pub tiobe_standard: f64,
}

impl MetricValues {
    pub fn from_json(obj: &Map<String, JsonValue>) -> Self {
        let float = |key: &str| {
            obj.get(key)
                .and_then(JsonValue::as_f64)
                .filter(|v| v.is_finite())
                .unwrap_or_default()
        };
        let int = |key: &str| {
            obj.get(key)
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
                .unwrap_or_default()
        };

        Self {
            comment_ratio: float("comment_ratio"),
            cyclomatic_complexity: int("cyclomatic_complexity"),
            fanout_external: int("fanout_external"),
            fanout_internal: int("fanout_internal"),
            halstead_bugprop: float("halstead_bugprop"),
            halstead_difficulty: float("halstead_difficulty"),
            halstead_effort: float("halstead_effort"),
            halstead_timerequired: float("halstead_timerequired"),
            halstead_volume: float("halstead_volume"),
            programming_lang: language(obj.get("lang")),
            lines_of_code: int("loc"),
            maintainability_index: float("maintainability_index"),
            operands_sum: int("operands_sum"),
            operands_uniq: int("operands_uniq"),
            operators_sum: int("operators_sum"),
            operators_uniq: int("operators_uniq"),
            tiobe: float("tiobe"),
            tiobe_compiler: float("tiobe_compiler"),
            tiobe_complexity: float("tiobe_complexity"),
            tiobe_coverage: float("tiobe_coverage"),
            tiobe_duplication: float("tiobe_duplication"),
            tiobe_fanout: float("tiobe_fanout"),
            tiobe_functional: float("tiobe_functional"),
            tiobe_security: float("tiobe_security"),
            tiobe_standard: float("tiobe_standard"),
        }
    }
}

fn language(value: Option<&JsonValue>) -> String {
    match value {
        Some(JsonValue::String(lang)) => lang.clone(),
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(JsonValue::as_str)
            .collect::<Vec<_>>()
            .join(","),
        _ => String::new(),
    }
}

/// Parsed multimetric output for one project.
#[derive(Debug, Clone, Default)]
pub struct FlatReport {
    /// Per-file figures keyed by the path multimetric was given. Files
    /// reported as `{}` are left out.
    pub files: Vec<(String, MetricValues)>,
    pub overall: MetricValues,
    /// Set when multimetric produced nothing usable.
    pub failure: Option<ToolError>,
}

impl FlatReport {
    /// Read a multimetric document; missing sections stay zeroed.
    pub fn from_document(doc: &Map<String, JsonValue>) -> Self {
        let section = |value: Option<&JsonValue>| {
            value
                .and_then(JsonValue::as_object)
                .map(MetricValues::from_json)
                .unwrap_or_default()
        };

        let files = doc
            .get("files")
            .and_then(JsonValue::as_object)
            .map(|files| {
                files
                    .iter()
                    .filter_map(|(path, figures)| {
                        figures
                            .as_object()
                            .filter(|obj| !obj.is_empty())
                            .map(|obj| (path.clone(), MetricValues::from_json(obj)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            files,
            overall: section(doc.get("overall")),
            failure: None,
        }
    }

    /// An empty report recording why the tool failed.
    pub fn failed(failure: ToolError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn reads_figures_with_mixed_number_types() {
        let values = MetricValues::from_json(&object(json!({
            "comment_ratio": 12.5,
            "cyclomatic_complexity": 7,
            "fanout_external": 3.0,
            "halstead_volume": 410.2,
            "lang": ["Python"],
            "loc": 120,
            "maintainability_index": 88.1,
            "operands_sum": 55,
            "tiobe": 97.3
        })));

        assert_eq!(values.comment_ratio, 12.5);
        assert_eq!(values.cyclomatic_complexity, 7);
        assert_eq!(values.fanout_external, 3);
        assert_eq!(values.fanout_internal, 0);
        assert_eq!(values.programming_lang, "Python");
        assert_eq!(values.lines_of_code, 120);
        assert_eq!(values.operands_sum, 55);
        assert_eq!(values.tiobe_security, 0.0);
    }

    #[test]
    fn language_list_is_joined() {
        let values = MetricValues::from_json(&object(json!({"lang": ["Python", "Cython"]})));
        assert_eq!(values.programming_lang, "Python,Cython");

        let values = MetricValues::from_json(&object(json!({"lang": "Python"})));
        assert_eq!(values.programming_lang, "Python");

        let values = MetricValues::from_json(&object(json!({"lang": 3})));
        assert_eq!(values.programming_lang, "");
    }

    #[test]
    fn document_sections_are_split_and_empty_files_dropped() {
        let report = FlatReport::from_document(&object(json!({
            "files": {
                "Analysis/p_analysis/a.py": {"loc": 10, "lang": ["Python"]},
                "Analysis/p_analysis/empty.py": {}
            },
            "overall": {"loc": 10, "tiobe": 90.0},
            "stats": {
                "mean": {"loc": 10},
                "sd": {"loc": 0}
            }
        })));

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].0, "Analysis/p_analysis/a.py");
        assert_eq!(report.overall.lines_of_code, 10);
        assert_eq!(report.overall.tiobe, 90.0);
        assert!(report.failure.is_none());
    }

    #[test]
    fn missing_sections_read_as_zero() {
        let report = FlatReport::from_document(&object(json!({"unexpected": true})));
        assert!(report.files.is_empty());
        assert_eq!(report.overall, MetricValues::default());
    }
}
