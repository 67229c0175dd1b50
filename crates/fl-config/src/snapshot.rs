//! Configuration snapshots for run reports and reproducibility.
//!
//! A snapshot records which engine.json a run used and the values that
//! matter for scoring, so two reports can be checked for comparable settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::engine::{ComponentWeights, ConfidenceThresholds, EngineConfig};
use crate::resolve::{ConfigPaths, ConfigSource};

/// Hash input used when no file was loaded.
const DEFAULTS_MARKER: &str = "builtin-default";

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Hostname where snapshot was taken.
    #[serde(default)]
    pub hostname: Option<String>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path engine.json was loaded from.
    #[serde(default)]
    pub config_path: Option<String>,

    /// Source of the configuration.
    pub config_source: String,

    /// SHA-256 of the engine.json content, or of a fixed marker for defaults.
    pub content_hash: String,

    /// Effective values.
    pub summary: ConfigSummary,
}

/// Effective scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub weights: ComponentWeights,
    pub thresholds: ConfidenceThresholds,
    pub recent_window_hours: u32,
}

impl From<&EngineConfig> for ConfigSummary {
    fn from(config: &EngineConfig) -> Self {
        ConfigSummary {
            weights: config.weights,
            thresholds: config.thresholds,
            recent_window_hours: config.activity.recent_window_hours,
        }
    }
}

impl ConfigSnapshot {
    /// Create a snapshot from a loaded configuration and its raw JSON.
    pub fn new(config: &EngineConfig, paths: &ConfigPaths, raw_json: Option<&str>) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            hostname: current_hostname(),
            schema_version: config.schema_version.clone(),
            config_path: paths.engine.as_ref().map(|p| p.display().to_string()),
            config_source: paths.engine_source.to_string(),
            content_hash: hash_content(raw_json.unwrap_or(DEFAULTS_MARKER)),
            summary: ConfigSummary::from(config),
        }
    }

    /// Create a snapshot with only defaults (no config file loaded).
    pub fn defaults_only() -> Self {
        let config = EngineConfig::default();
        ConfigSnapshot {
            timestamp: Utc::now(),
            hostname: current_hostname(),
            schema_version: config.schema_version.clone(),
            config_path: None,
            config_source: ConfigSource::BuiltinDefault.to_string(),
            content_hash: hash_content(DEFAULTS_MARKER),
            summary: ConfigSummary::from(&config),
        }
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether two snapshots were taken from identical configuration content.
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.content_hash == other.content_hash
    }

    /// Short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.content_hash[..12.min(self.content_hash.len())]
    }
}

fn current_hostname() -> Option<String> {
    hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().to_string())
}

/// Hash content with SHA-256 and return hex string.
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
