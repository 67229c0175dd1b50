//! Fixed editorial bands for reading an entropy report.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Below this many bits: LOW.
pub const LOW_ENTROPY_BITS: f64 = 10.0;
/// Below this many bits: MODERATE; at or above: HIGH.
pub const HIGH_ENTROPY_BITS: f64 = 20.0;
/// Uniqueness below this: WARNING.
pub const UNIQUENESS_WARNING: f64 = 0.5;
/// Uniqueness above this: EXCELLENT.
pub const UNIQUENESS_EXCELLENT: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterpretationLevel {
    Low,
    Moderate,
    High,
    Warning,
    Excellent,
}

impl InterpretationLevel {
    /// Whether this reading is good news.
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            InterpretationLevel::High | InterpretationLevel::Excellent
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            InterpretationLevel::Low => "LOW",
            InterpretationLevel::Moderate => "MODERATE",
            InterpretationLevel::High => "HIGH",
            InterpretationLevel::Warning => "WARNING",
            InterpretationLevel::Excellent => "EXCELLENT",
        }
    }
}

impl std::fmt::Display for InterpretationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Interpretation {
    pub level: InterpretationLevel,
    pub message: String,
    pub recommendation: String,
}

impl Interpretation {
    fn new(level: InterpretationLevel, message: impl Into<String>, recommendation: &str) -> Self {
        Self {
            level,
            message: message.into(),
            recommendation: recommendation.to_string(),
        }
    }
}

/// One entropy reading, plus a uniqueness reading when the rate is outside
/// the `[0.5, 0.9]` middle band.
pub fn interpret(shannon_entropy: f64, uniqueness_rate: f64) -> Vec<Interpretation> {
    let mut out = Vec::with_capacity(2);

    out.push(if shannon_entropy < LOW_ENTROPY_BITS {
        Interpretation::new(
            InterpretationLevel::Low,
            "Low entropy: limited ability to distinguish users.",
            "Add more fingerprinting vectors to improve uniqueness.",
        )
    } else if shannon_entropy < HIGH_ENTROPY_BITS {
        Interpretation::new(
            InterpretationLevel::Moderate,
            "Moderate entropy: can distinguish thousands of users.",
            "Adequate for medium-scale applications.",
        )
    } else {
        Interpretation::new(
            InterpretationLevel::High,
            "High entropy: can distinguish millions of users.",
            "Excellent unique identification capability.",
        )
    });

    let percent = uniqueness_rate * 100.0;
    if uniqueness_rate < UNIQUENESS_WARNING {
        out.push(Interpretation::new(
            InterpretationLevel::Warning,
            format!("Low uniqueness rate ({percent:.1}%)"),
            "Many collisions detected. Review the implementation.",
        ));
    } else if uniqueness_rate > UNIQUENESS_EXCELLENT {
        out.push(Interpretation::new(
            InterpretationLevel::Excellent,
            format!("Excellent uniqueness rate ({percent:.1}%)"),
            "System is performing very well.",
        ));
    }

    out
}
