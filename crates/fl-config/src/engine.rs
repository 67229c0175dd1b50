//! Engine configuration types.
//!
//! Every section of engine.json is optional; omitted sections and fields
//! take the built-in defaults below.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::ValidationError;

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngineConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub weights: ComponentWeights,

    #[serde(default)]
    pub thresholds: ConfidenceThresholds,

    #[serde(default)]
    pub activity: ActivityWindow,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            description: None,
            weights: ComponentWeights::default(),
            thresholds: ConfidenceThresholds::default(),
            activity: ActivityWindow::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::ParseError(e.to_string()))
    }
}

/// Relative weight of each component in the overall similarity score.
///
/// Only components present on both sides contribute, and the score is
/// normalized by the weight actually compared, so weights need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComponentWeights {
    pub canvas: f64,
    pub webgl: f64,
    pub audio: f64,
    pub browser: f64,
    /// Cores, memory, and concurrency.
    pub hardware_stable: f64,
    /// Timing benchmarks.
    pub hardware_dynamic: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            canvas: 0.30,
            webgl: 0.20,
            audio: 0.20,
            browser: 0.20,
            hardware_stable: 0.07,
            hardware_dynamic: 0.03,
        }
    }
}

impl ComponentWeights {
    /// `(name, weight)` pairs in a fixed order, for validation and reports.
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("canvas", self.canvas),
            ("webgl", self.webgl),
            ("audio", self.audio),
            ("browser", self.browser),
            ("hardware_stable", self.hardware_stable),
            ("hardware_dynamic", self.hardware_dynamic),
        ]
    }

    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, w)| w).sum()
    }
}

/// Score cutoffs for the confidence tiers, checked from the top down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConfidenceThresholds {
    /// At or above: `exact`.
    pub exact_match: f64,
    /// At or above: `high`, and the same-device cutoff.
    pub same_device: f64,
    /// At or above: `medium`.
    pub likely_same: f64,
    /// At or above: `low`. Below: `none`.
    pub possibly_same: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            exact_match: 1.0,
            same_device: 0.85,
            likely_same: 0.75,
            possibly_same: 0.65,
        }
    }
}

/// Window used for the recent-activity count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ActivityWindow {
    pub recent_window_hours: u32,
}

impl Default for ActivityWindow {
    fn default() -> Self {
        Self {
            recent_window_hours: 24,
        }
    }
}
