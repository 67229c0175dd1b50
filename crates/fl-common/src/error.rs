//! Error types for fplink.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! The matching engine itself never fails; these errors come from the outer
//! surfaces (record ingestion, the log store, configuration, CLI input).
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Malformed Record
//!   Reason: malformed record at line 12: missing field `sessionId`
//!   Fix: The line is skipped on load. Inspect it with 'sed -n 12p <log>'.
//! ```
//!
//! # Agent-Facing Output
//!
//! ```json
//! {
//!   "code": 21,
//!   "category": "ingest",
//!   "message": "malformed record at line 12: missing field `sessionId`",
//!   "recoverable": true,
//!   "suggested_action": "skip",
//!   "context": { "line": 12 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for fplink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Engine configuration errors (weights, thresholds, schema).
    Config,
    /// Record payload and log line errors.
    Ingest,
    /// Errors about the dataset as a whole.
    Dataset,
    /// File I/O and serialization errors.
    Io,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Config => "config",
            ErrorCategory::Ingest => "ingest",
            ErrorCategory::Dataset => "dataset",
            ErrorCategory::Io => "io",
        }
    }

    /// Half-open range of codes owned by this category.
    pub fn code_range(self) -> std::ops::Range<u32> {
        match self {
            ErrorCategory::Config => 10..20,
            ErrorCategory::Ingest => 20..30,
            ErrorCategory::Dataset => 30..40,
            ErrorCategory::Io => 60..70,
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a caller (human or script) should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    Retry,
    /// Remove or repair engine.json.
    ResetConfig,
    /// Run `fplink check`.
    RunCheck,
    /// Correct the input and resubmit.
    FixInput,
    /// Drop the offending line and carry on.
    Skip,
    /// Collect more fingerprints before analyzing.
    CollectMore,
    ManualIntervention,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SuggestedAction::Retry => "retry",
            SuggestedAction::ResetConfig => "reset_config",
            SuggestedAction::RunCheck => "run_check",
            SuggestedAction::FixInput => "fix_input",
            SuggestedAction::Skip => "skip",
            SuggestedAction::CollectMore => "collect_more",
            SuggestedAction::ManualIntervention => "manual_intervention",
        };
        f.write_str(name)
    }
}

/// Unified error type for fplink.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    #[error("invalid fingerprint payload: {0}")]
    InvalidPayload(String),

    #[error("malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("record {id} not found")]
    RecordNotFound { id: String },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Static facts about one error variant.
#[derive(Debug, Clone, Copy)]
struct ErrorMeta {
    code: u32,
    category: ErrorCategory,
    recoverable: bool,
    action: SuggestedAction,
    headline: &'static str,
    remediation: &'static str,
}

const fn meta(
    code: u32,
    category: ErrorCategory,
    recoverable: bool,
    action: SuggestedAction,
    headline: &'static str,
    remediation: &'static str,
) -> ErrorMeta {
    ErrorMeta {
        code,
        category,
        recoverable,
        action,
        headline,
        remediation,
    }
}

const CONFIG: ErrorMeta = meta(
    10,
    ErrorCategory::Config,
    true,
    SuggestedAction::RunCheck,
    "Configuration Error",
    "Run 'fplink check' to validate configuration, or check syntax in engine.json.",
);
const INVALID_CONFIG: ErrorMeta = meta(
    11,
    ErrorCategory::Config,
    true,
    SuggestedAction::ResetConfig,
    "Invalid Engine Configuration",
    "Fix the reported field in engine.json, or remove the file to use built-in defaults.",
);
const SCHEMA_VALIDATION: ErrorMeta = meta(
    12,
    ErrorCategory::Config,
    true,
    SuggestedAction::RunCheck,
    "Unsupported Schema Version",
    "Ensure engine.json declares the supported schema_version. See 'fplink schema EngineConfig'.",
);
const INVALID_PAYLOAD: ErrorMeta = meta(
    20,
    ErrorCategory::Ingest,
    false,
    SuggestedAction::FixInput,
    "Invalid Fingerprint Payload",
    "The payload must be a JSON object with a sessionId. See 'fplink schema FingerprintRecord'.",
);
const MALFORMED_RECORD: ErrorMeta = meta(
    21,
    ErrorCategory::Ingest,
    true,
    SuggestedAction::Skip,
    "Malformed Record",
    "The line is skipped on load. Inspect it and repair or remove it from the log.",
);
const RECORD_NOT_FOUND: ErrorMeta = meta(
    22,
    ErrorCategory::Ingest,
    false,
    SuggestedAction::FixInput,
    "Record Not Found",
    "Check the record id against 'fplink analytics' output.",
);
const EMPTY_DATASET: ErrorMeta = meta(
    30,
    ErrorCategory::Dataset,
    true,
    SuggestedAction::CollectMore,
    "Empty Dataset",
    "No fingerprints have been collected yet. Ingest records before analyzing.",
);
const IO: ErrorMeta = meta(
    60,
    ErrorCategory::Io,
    true,
    SuggestedAction::Retry,
    "I/O Error",
    "Check that the log path exists and is readable, then retry.",
);
const JSON: ErrorMeta = meta(
    61,
    ErrorCategory::Io,
    true,
    SuggestedAction::ManualIntervention,
    "JSON Parse Error",
    "Invalid JSON in input. Check syntax with 'jq . <file>'.",
);

impl Error {
    fn meta(&self) -> &'static ErrorMeta {
        match self {
            Error::Config(_) => &CONFIG,
            Error::InvalidConfig(_) => &INVALID_CONFIG,
            Error::SchemaValidation(_) => &SCHEMA_VALIDATION,
            Error::InvalidPayload(_) => &INVALID_PAYLOAD,
            Error::MalformedRecord { .. } => &MALFORMED_RECORD,
            Error::RecordNotFound { .. } => &RECORD_NOT_FOUND,
            Error::EmptyDataset => &EMPTY_DATASET,
            Error::Io(_) => &IO,
            Error::Json(_) => &JSON,
        }
    }

    /// Stable numeric code; always inside `self.category().code_range()`.
    pub fn code(&self) -> u32 {
        self.meta().code
    }

    pub fn category(&self) -> ErrorCategory {
        self.meta().category
    }

    /// Malformed log lines, config problems and I/O are recoverable; a bad
    /// payload or unknown id needs a different request.
    pub fn is_recoverable(&self) -> bool {
        self.meta().recoverable
    }

    pub fn suggested_action(&self) -> SuggestedAction {
        self.meta().action
    }

    pub fn remediation(&self) -> &'static str {
        self.meta().remediation
    }

    pub fn headline(&self) -> &'static str {
        self.meta().headline
    }

    /// Structured context attached to the JSON form of this error.
    fn context(&self) -> HashMap<String, serde_json::Value> {
        let mut context = HashMap::new();
        match self {
            Error::MalformedRecord { line, .. } => {
                context.insert("line".to_string(), serde_json::json!(line));
            }
            Error::RecordNotFound { id } => {
                context.insert("record_id".to_string(), serde_json::json!(id));
            }
            _ => {}
        }
        context
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: u32,
    pub category: ErrorCategory,
    /// The `Display` form of the error.
    pub message: String,
    pub recoverable: bool,
    pub suggested_action: SuggestedAction,
    /// Extra fields such as `line`, `record_id`, `run_id`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let meta = err.meta();
        StructuredError {
            code: meta.code,
            category: meta.category,
            message: err.to_string(),
            recoverable: meta.recoverable,
            suggested_action: meta.action,
            context: err.context(),
        }
    }
}

impl StructuredError {
    /// Attach one more context field; values that fail to serialize are dropped.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Compact single-line JSON, as written to stderr.
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(_) => format!(r#"{{"code":{},"category":"{}"}}"#, self.code, self.category),
        }
    }
}

/// Three-line stderr rendering: headline, reason, fix.
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let paint = |code: &str, text: &str| {
        if use_color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    };
    let lines = [
        format!("{} {}", paint("31", "✗"), err.headline()),
        format!("  Reason: {err}"),
        format!("  {} {}", paint("36", "Fix:"), err.remediation()),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_by_category() {
        assert_eq!(Error::Config("x".into()).code(), 10);
        assert_eq!(Error::InvalidPayload("x".into()).code(), 20);
        assert_eq!(Error::EmptyDataset.code(), 30);
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.code(), 60);
        assert_eq!(io.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_codes_stay_in_category_range() {
        let errors = vec![
            Error::Config("a".into()),
            Error::InvalidConfig("b".into()),
            Error::SchemaValidation("c".into()),
            Error::InvalidPayload("d".into()),
            Error::MalformedRecord {
                line: 3,
                message: "e".into(),
            },
            Error::RecordNotFound { id: "f".into() },
            Error::EmptyDataset,
        ];
        for err in &errors {
            let range = err.category().code_range();
            assert!(range.contains(&err.code()), "{err:?} outside {range:?}");
        }
    }

    #[test]
    fn test_structured_error_context() {
        let err = Error::MalformedRecord {
            line: 12,
            message: "missing field `sessionId`".into(),
        };
        let structured = StructuredError::from(&err);
        assert_eq!(structured.code, 21);
        assert_eq!(structured.category, ErrorCategory::Ingest);
        assert_eq!(structured.suggested_action, SuggestedAction::Skip);
        assert_eq!(structured.context["line"], serde_json::json!(12));

        let json = structured.with_context("path", "fingerprints.log").to_json();
        assert!(json.contains("\"category\":\"ingest\""));
        assert!(json.contains("fingerprints.log"));
    }

    #[test]
    fn test_format_error_human_plain() {
        let out = format_error_human(&Error::EmptyDataset, false);
        assert!(out.starts_with("✗ Empty Dataset"));
        assert!(out.contains("Reason: dataset is empty"));
        assert!(out.contains("Fix: No fingerprints"));
        assert!(!out.contains("\x1b["));
    }
}
