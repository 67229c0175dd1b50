//! Confidence tiers derived from a similarity score.

use fl_config::ConfidenceThresholds;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Discrete confidence that two observations come from the same device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
    Exact,
}

impl Confidence {
    /// Map a score to a tier, checking thresholds from the top down.
    pub fn from_score(score: f64, thresholds: &ConfidenceThresholds) -> Self {
        if score >= thresholds.exact_match {
            Confidence::Exact
        } else if score >= thresholds.same_device {
            Confidence::High
        } else if score >= thresholds.likely_same {
            Confidence::Medium
        } else if score >= thresholds.possibly_same {
            Confidence::Low
        } else {
            Confidence::None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Confidence::Exact => "exact",
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
            Confidence::None => "none",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
