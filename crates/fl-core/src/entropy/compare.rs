//! Before/after comparison of two analyzed datasets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::EntropyReport;

/// Headline figures for one side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSide {
    pub total_entries: u64,
    pub unique_fingerprints: usize,
    pub shannon_entropy: f64,
    pub uniqueness_rate: f64,
}

impl From<&EntropyReport> for DatasetSide {
    fn from(report: &EntropyReport) -> Self {
        Self {
            total_entries: report.summary.total_entries,
            unique_fingerprints: report.summary.unique_fingerprints,
            shannon_entropy: report.entropy.shannon_entropy,
            uniqueness_rate: report.summary.uniqueness_rate,
        }
    }
}

/// Direction of the entropy change from A to B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increased,
    Decreased,
    Unchanged,
}

impl Trend {
    fn of(delta: f64) -> Self {
        if delta > 0.0 {
            Trend::Increased
        } else if delta < 0.0 {
            Trend::Decreased
        } else {
            Trend::Unchanged
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatasetComparison {
    pub dataset_a: DatasetSide,
    pub dataset_b: DatasetSide,
    /// `H(B) - H(A)` in bits.
    pub entropy_delta_bits: f64,
    /// Delta relative to `H(A)`, in percent. `None` when `H(A)` is 0.
    pub entropy_delta_percent: Option<f64>,
    /// Uniqueness-rate change in percentage points.
    pub uniqueness_delta: f64,
    pub entropy_trend: Trend,
    pub uniqueness_trend: Trend,
}

pub fn compare_datasets(a: &EntropyReport, b: &EntropyReport) -> DatasetComparison {
    let dataset_a = DatasetSide::from(a);
    let dataset_b = DatasetSide::from(b);

    let entropy_delta_bits = dataset_b.shannon_entropy - dataset_a.shannon_entropy;
    let entropy_delta_percent = (dataset_a.shannon_entropy > 0.0)
        .then(|| entropy_delta_bits / dataset_a.shannon_entropy * 100.0);
    let uniqueness_change = dataset_b.uniqueness_rate - dataset_a.uniqueness_rate;

    DatasetComparison {
        entropy_delta_bits,
        entropy_delta_percent,
        uniqueness_delta: uniqueness_change * 100.0,
        entropy_trend: Trend::of(entropy_delta_bits),
        uniqueness_trend: Trend::of(uniqueness_change),
        dataset_a,
        dataset_b,
    }
}
