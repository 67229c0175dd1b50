//! Entropy analysis of a fingerprint record stream.
//!
//! Independent of clustering: this measures how well raw fingerprint ids
//! and individual component values spread across the observed population.
//! `H` is Shannon entropy in bits; `2^H` estimates how many equally likely
//! identities the data could distinguish.

pub mod compare;
pub mod interpret;
pub mod temporal;

pub use compare::{compare_datasets, DatasetComparison, DatasetSide, Trend};
pub use interpret::{interpret, Interpretation, InterpretationLevel};
pub use temporal::{HourBucket, TemporalDistribution};

use std::collections::{BTreeMap, BTreeSet};

use fl_common::FingerprintRecord;
use fl_math::{perplexity, FrequencyTable};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntropySummary {
    pub total_entries: u64,
    pub unique_fingerprints: usize,
    pub unique_sessions: usize,
    /// `unique_fingerprints / total_entries`; 0 when empty.
    pub uniqueness_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntropyMetrics {
    pub shannon_entropy: f64,
    pub normalized_entropy: f64,
    /// `log2(total_entries)`.
    pub max_possible_entropy: f64,
    /// `2^H`.
    pub distinguishable_users: f64,
    pub bits_of_entropy: f64,
}

impl EntropyMetrics {
    fn from_table<K: Ord>(table: &FrequencyTable<K>) -> Self {
        let h = table.entropy();
        Self {
            shannon_entropy: h,
            normalized_entropy: table.normalized_entropy(),
            max_possible_entropy: table.max_entropy(),
            distinguishable_users: perplexity(h),
            bits_of_entropy: h,
        }
    }
}

/// Full entropy report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntropyReport {
    pub summary: EntropySummary,
    pub entropy: EntropyMetrics,
    /// Bits per component, for components observed at least once. Each value
    /// is over that component's own count; the browser-side analyzer divides
    /// by `totalEntries` instead, so its per-component figures are not
    /// directly comparable with these.
    pub component_entropies: BTreeMap<String, f64>,
    pub temporal: TemporalDistribution,
    pub interpretation: Vec<Interpretation>,
}

/// Frequency tables for the individually counted components.
#[derive(Debug, Default)]
struct ComponentTables {
    canvas: FrequencyTable<String>,
    webgl: FrequencyTable<String>,
    audio: FrequencyTable<String>,
    port_contention: FrequencyTable<String>,
}

impl ComponentTables {
    fn observe(&mut self, record: &FingerprintRecord) {
        let c = &record.components;
        if let Some(canvas) = &c.canvas {
            self.canvas.observe(canvas.hash.clone());
        }
        if let Some(webgl) = &c.webgl {
            self.webgl.observe(webgl.composite_key());
        }
        if let Some(audio) = &c.audio {
            self.audio.observe(audio.hash.clone());
        }
        if let Some(port) = &c.port_contention {
            self.port_contention.observe(port.clone());
        }
    }

    /// Entropy per non-empty table, each over its own total.
    fn entropies(&self) -> BTreeMap<String, f64> {
        [
            ("canvas", &self.canvas),
            ("webgl", &self.webgl),
            ("audio", &self.audio),
            ("portContention", &self.port_contention),
        ]
        .into_iter()
        .filter(|(_, table)| table.total() > 0)
        .map(|(name, table)| (name.to_string(), table.entropy()))
        .collect()
    }
}

/// Analyze a record stream. An empty stream yields an all-zero report with
/// no peak hour and no interpretation.
pub fn analyze_entropy(records: &[FingerprintRecord]) -> EntropyReport {
    if records.is_empty() {
        return EntropyReport::default();
    }

    let ids: FrequencyTable<&str> = records.iter().map(|r| r.id.as_str()).collect();
    let sessions: BTreeSet<&str> = records.iter().map(|r| r.session_id.as_str()).collect();

    let mut components = ComponentTables::default();
    for record in records {
        components.observe(record);
    }

    let total = ids.total();
    let unique = ids.distinct();
    let uniqueness_rate = unique as f64 / total as f64;
    let entropy = EntropyMetrics::from_table(&ids);
    let interpretation = interpret(entropy.shannon_entropy, uniqueness_rate);

    EntropyReport {
        summary: EntropySummary {
            total_entries: total,
            unique_fingerprints: unique,
            unique_sessions: sessions.len(),
            uniqueness_rate,
        },
        entropy,
        component_entropies: components.entropies(),
        temporal: TemporalDistribution::from_timestamps(
            records.iter().map(|r| &r.server_timestamp),
        ),
        interpretation,
    }
}
