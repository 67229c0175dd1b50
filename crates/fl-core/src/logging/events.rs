//! Structured event definitions for logging.
//!
//! Event names double as tracing targets, so a JSONL consumer can filter on
//! the `event` key without parsing messages.

use serde::{Deserialize, Serialize};

/// Log levels for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Processing stages of one fplink run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading or appending fingerprint records.
    Ingest,
    /// Pairwise similarity scoring.
    Score,
    /// Grouping records into devices.
    Cluster,
    /// Device statistics.
    Aggregate,
    /// Entropy analysis.
    Entropy,
    /// Report rendering.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Ingest => "ingest",
            Stage::Score => "score",
            Stage::Cluster => "cluster",
            Stage::Aggregate => "aggregate",
            Stage::Entropy => "entropy",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Ingest
    pub const INGEST_LOADED: &str = "ingest.loaded";
    pub const INGEST_LINE_SKIPPED: &str = "ingest.line_skipped";
    pub const INGEST_APPENDED: &str = "ingest.appended";

    // Engine
    pub const SCORE_COMPUTED: &str = "score.computed";
    pub const CLUSTER_STARTED: &str = "cluster.started";
    pub const CLUSTER_GROUP_CREATED: &str = "cluster.group_created";
    pub const CLUSTER_FINISHED: &str = "cluster.finished";
    pub const AGGREGATE_FINISHED: &str = "aggregate.finished";
    pub const ENTROPY_FINISHED: &str = "entropy.finished";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";
}

/// Correlation context attached to every CLI-level event.
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Unique ID for this invocation.
    pub run_id: String,
    /// Label of the dataset being processed (usually the log path).
    pub dataset: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            dataset: None,
        }
    }

    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    /// Dataset label for log fields; empty when unset.
    pub fn dataset_label(&self) -> &str {
        self.dataset.as_deref().unwrap_or("")
    }
}
