//! Similarity scoring and confidence classification.
//!
//! [`Matcher::score`] compares two component bags. Only components present
//! on both sides take part: each contributes `sub_score * weight` to the
//! numerator and `weight` to the denominator, so a missing component is
//! neither a penalty nor a reward. With nothing comparable the score is 0.

pub mod components;
pub mod confidence;
pub mod user_agent;

pub use confidence::Confidence;
pub use user_agent::{browser_family, BrowserFamily};

use fl_common::ComponentBag;
use fl_config::{ComponentWeights, ConfidenceThresholds, EngineConfig};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Scorer and classifier configured with one set of weights and thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matcher {
    pub weights: ComponentWeights,
    pub thresholds: ConfidenceThresholds,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            weights: ComponentWeights::default(),
            thresholds: ConfidenceThresholds::default(),
        }
    }
}

/// Sub-score per component; `None` when the component was not comparable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScores {
    pub canvas: Option<f64>,
    pub webgl: Option<f64>,
    pub audio: Option<f64>,
    pub browser: Option<f64>,
    pub hardware_stable: Option<f64>,
    pub hardware_dynamic: Option<f64>,
}

impl ComponentScores {
    fn entries(&self) -> [Option<f64>; 6] {
        [
            self.canvas,
            self.webgl,
            self.audio,
            self.browser,
            self.hardware_stable,
            self.hardware_dynamic,
        ]
    }

    /// Weighted combination, normalized by the weight actually compared.
    ///
    /// Weights so large that their sum overflows are rescaled by the largest
    /// weight first; the ratio is the same either way.
    pub fn combine(&self, weights: &ComponentWeights) -> f64 {
        let score = self.weighted_ratio(weights, 1.0);
        if score.is_finite() {
            return score;
        }
        let largest = weights
            .entries()
            .iter()
            .map(|(_, w)| *w)
            .filter(|w| w.is_finite())
            .fold(0.0, f64::max);
        if largest > 0.0 {
            let rescaled = self.weighted_ratio(weights, largest);
            if rescaled.is_finite() {
                return rescaled;
            }
        }
        0.0
    }

    fn weighted_ratio(&self, weights: &ComponentWeights, scale: f64) -> f64 {
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (score, (_, weight)) in self.entries().iter().zip(weights.entries()) {
            if let Some(score) = score {
                let weight = weight / scale;
                numerator += score * weight;
                denominator += weight;
            }
        }
        if denominator > 0.0 {
            numerator / denominator
        } else {
            0.0
        }
    }

    /// Sum of the weights of the components that were compared.
    pub fn compared_weight(&self, weights: &ComponentWeights) -> f64 {
        self.entries()
            .iter()
            .zip(weights.entries())
            .filter(|(score, _)| score.is_some())
            .map(|(_, (_, weight))| weight)
            .sum()
    }
}

/// Full result of comparing two fingerprints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub similarity_score: f64,
    /// Score as a percentage with one decimal, e.g. `"91.3%"`.
    pub similarity: String,
    pub is_match: bool,
    pub confidence: Confidence,
    pub components: ComponentScores,
    pub compared_weight: f64,
    pub thresholds: ConfidenceThresholds,
}

impl Matcher {
    pub fn new(weights: ComponentWeights, thresholds: ConfidenceThresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.weights, config.thresholds)
    }

    /// Per-component sub-scores for the components present on both sides.
    pub fn breakdown(&self, a: &ComponentBag, b: &ComponentBag) -> ComponentScores {
        let (hardware_stable, hardware_dynamic) = match (&a.hardware, &b.hardware) {
            (Some(x), Some(y)) => (
                Some(components::hardware_stable_score(x, y)),
                Some(components::hardware_dynamic_score(x, y)),
            ),
            _ => (None, None),
        };

        ComponentScores {
            canvas: both(&a.canvas, &b.canvas, components::hash_score),
            webgl: both(&a.webgl, &b.webgl, components::webgl_score),
            audio: both(&a.audio, &b.audio, components::hash_score),
            browser: both(&a.browser, &b.browser, components::browser_score),
            hardware_stable,
            hardware_dynamic,
        }
    }

    /// Similarity in `[0, 1]`.
    pub fn score(&self, a: &ComponentBag, b: &ComponentBag) -> f64 {
        self.breakdown(a, b).combine(&self.weights)
    }

    /// Like [`Matcher::score`], but a missing bag on either side scores 0.
    pub fn score_optional(&self, a: Option<&ComponentBag>, b: Option<&ComponentBag>) -> f64 {
        match (a, b) {
            (Some(a), Some(b)) => self.score(a, b),
            _ => 0.0,
        }
    }

    pub fn classify(&self, score: f64) -> Confidence {
        Confidence::from_score(score, &self.thresholds)
    }

    pub fn is_same_device(&self, a: &ComponentBag, b: &ComponentBag) -> bool {
        self.is_match_score(self.score(a, b))
    }

    /// Whether a score reaches the same-device cutoff.
    pub fn is_match_score(&self, score: f64) -> bool {
        score >= self.thresholds.same_device
    }

    /// Score, classify, and explain one pair.
    pub fn compare(&self, a: &ComponentBag, b: &ComponentBag) -> Comparison {
        let components = self.breakdown(a, b);
        let score = components.combine(&self.weights);
        let confidence = self.classify(score);

        tracing::trace!(
            target: crate::logging::event_names::SCORE_COMPUTED,
            stage = %crate::logging::Stage::Score,
            score,
            confidence = %confidence,
            "pair scored"
        );

        Comparison {
            similarity_score: score,
            similarity: format!("{:.1}%", score * 100.0),
            is_match: self.is_match_score(score),
            confidence,
            compared_weight: components.compared_weight(&self.weights),
            components,
            thresholds: self.thresholds,
        }
    }
}

fn both<T>(a: &Option<T>, b: &Option<T>, f: fn(&T, &T) -> f64) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(f(x, y)),
        _ => None,
    }
}
