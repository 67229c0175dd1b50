//! Human-readable renderings of engine results.
//!
//! JSON output is plain serde; this module covers the `md` and `summary`
//! formats.

use std::fmt::Write;

use fl_config::ConfigSnapshot;

use crate::entropy::{DatasetComparison, EntropyReport, Trend};
use crate::matcher::Comparison;
use crate::stats::{AnalyticsSnapshot, DeviceStats};

/// Markdown and one-line renderings.
pub trait Render {
    fn to_markdown(&self) -> String;
    fn summary_line(&self) -> String;
}

fn opt_score(score: Option<f64>) -> String {
    score.map_or_else(|| "n/a".to_string(), |s| format!("{:.3}", s))
}

impl Render for Comparison {
    fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Fingerprint comparison\n");
        let _ = writeln!(out, "- Similarity: {} ({:.4})", self.similarity, self.similarity_score);
        let _ = writeln!(out, "- Confidence: {}", self.confidence);
        let _ = writeln!(out, "- Same device: {}", if self.is_match { "yes" } else { "no" });
        let _ = writeln!(out, "- Compared weight: {:.2}\n", self.compared_weight);
        let _ = writeln!(out, "| Component | Score |");
        let _ = writeln!(out, "|-----------|-------|");
        let c = &self.components;
        for (name, score) in [
            ("canvas", c.canvas),
            ("webgl", c.webgl),
            ("audio", c.audio),
            ("browser", c.browser),
            ("hardware_stable", c.hardware_stable),
            ("hardware_dynamic", c.hardware_dynamic),
        ] {
            let _ = writeln!(out, "| {} | {} |", name, opt_score(score));
        }
        out
    }

    fn summary_line(&self) -> String {
        format!(
            "similarity {} confidence {} same_device {}",
            self.similarity, self.confidence, self.is_match
        )
    }
}

impl Render for DeviceStats {
    fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Device statistics\n");
        let _ = writeln!(out, "- Total fingerprints: {}", self.total_fingerprints);
        let _ = writeln!(out, "- Unique devices: {}", self.unique_devices);
        let _ = writeln!(out, "- Returning devices: {}", self.returning_devices);
        let _ = writeln!(
            out,
            "- Average collections per device: {:.2}",
            self.average_collections_per_device
        );
        let _ = writeln!(out, "- Recent activity: {}\n", self.recent_activity);

        if !self.device_groups.is_empty() {
            let _ = writeln!(out, "| Device | Fingerprints | Sessions | First seen | Last seen |");
            let _ = writeln!(out, "|--------|--------------|----------|------------|-----------|");
            for g in &self.device_groups {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} | {} |",
                    g.device_id,
                    g.fingerprint_count,
                    g.session_count,
                    g.first_seen.to_rfc3339(),
                    g.last_seen.to_rfc3339()
                );
            }
        }
        out
    }

    fn summary_line(&self) -> String {
        format!(
            "{} fingerprints, {} devices ({} returning), {:.2} per device, {} recent",
            self.total_fingerprints,
            self.unique_devices,
            self.returning_devices,
            self.average_collections_per_device,
            self.recent_activity
        )
    }
}

impl Render for AnalyticsSnapshot {
    fn to_markdown(&self) -> String {
        let mut out = self.stats.to_markdown();
        let _ = writeln!(out, "\n## Recent fingerprints\n");
        for recent in &self.recent_fingerprints {
            let _ = writeln!(out, "- {} at {}", recent.id, recent.timestamp.to_rfc3339());
        }
        let _ = writeln!(out, "\nLast updated: {}", self.last_updated.to_rfc3339());
        out
    }

    fn summary_line(&self) -> String {
        self.stats.summary_line()
    }
}

impl Render for EntropyReport {
    fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Fingerprint entropy analysis\n");

        let s = &self.summary;
        let _ = writeln!(out, "## Basic statistics\n");
        let _ = writeln!(out, "- Total entries: {}", s.total_entries);
        let _ = writeln!(out, "- Unique fingerprints: {}", s.unique_fingerprints);
        let _ = writeln!(out, "- Unique sessions: {}", s.unique_sessions);
        let _ = writeln!(out, "- Uniqueness rate: {:.2}%\n", s.uniqueness_rate * 100.0);

        let e = &self.entropy;
        let _ = writeln!(out, "## Entropy\n");
        let _ = writeln!(out, "- Shannon entropy: {:.4} bits", e.shannon_entropy);
        let _ = writeln!(out, "- Normalized entropy: {:.4}", e.normalized_entropy);
        let _ = writeln!(out, "- Maximum possible entropy: {:.4} bits", e.max_possible_entropy);
        let _ = writeln!(
            out,
            "- Distinguishable users: 2^{:.1} ~ {}\n",
            e.bits_of_entropy,
            e.distinguishable_users.floor()
        );

        if !self.component_entropies.is_empty() {
            let _ = writeln!(out, "## Entropy by component\n");
            for (component, bits) in &self.component_entropies {
                let _ = writeln!(out, "- {}: {:.4} bits", component, bits);
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "## Temporal distribution\n");
        if let Some(peak) = &self.temporal.peak_hour {
            let _ = writeln!(out, "- Peak hour: {} ({} entries)", peak.hour, peak.count);
        }
        let _ = writeln!(out, "- Average per hour: {:.1} entries\n", self.temporal.average_per_hour);

        if !self.interpretation.is_empty() {
            let _ = writeln!(out, "## Interpretation\n");
            for item in &self.interpretation {
                let mark = if item.level.is_positive() { "✓" } else { "!" };
                let _ = writeln!(out, "- {} [{}] {}", mark, item.level, item.message);
                let _ = writeln!(out, "  - {}", item.recommendation);
            }
        }
        out
    }

    fn summary_line(&self) -> String {
        format!(
            "{} entries, {} unique, H={:.4} bits, uniqueness {:.1}%",
            self.summary.total_entries,
            self.summary.unique_fingerprints,
            self.entropy.shannon_entropy,
            self.summary.uniqueness_rate * 100.0
        )
    }
}

impl Render for DatasetComparison {
    fn to_markdown(&self) -> String {
        let (a, b) = (&self.dataset_a, &self.dataset_b);
        let mut out = String::new();
        let _ = writeln!(out, "# Dataset comparison\n");
        let _ = writeln!(out, "| Metric | Dataset A | Dataset B |");
        let _ = writeln!(out, "|--------|-----------|-----------|");
        let _ = writeln!(out, "| Total entries | {} | {} |", a.total_entries, b.total_entries);
        let _ = writeln!(
            out,
            "| Unique fingerprints | {} | {} |",
            a.unique_fingerprints, b.unique_fingerprints
        );
        let _ = writeln!(
            out,
            "| Shannon entropy (bits) | {:.4} | {:.4} |",
            a.shannon_entropy, b.shannon_entropy
        );
        let _ = writeln!(
            out,
            "| Uniqueness rate | {:.2}% | {:.2}% |\n",
            a.uniqueness_rate * 100.0,
            b.uniqueness_rate * 100.0
        );

        let percent = self
            .entropy_delta_percent
            .map_or_else(String::new, |p| format!(" ({:.1}%)", p.abs()));
        let _ = match self.entropy_trend {
            Trend::Increased => writeln!(
                out,
                "- Entropy increased by {:.4} bits{}",
                self.entropy_delta_bits, percent
            ),
            Trend::Decreased => writeln!(
                out,
                "- Entropy decreased by {:.4} bits{}",
                self.entropy_delta_bits.abs(),
                percent
            ),
            Trend::Unchanged => writeln!(out, "- Entropy unchanged"),
        };
        let _ = match self.uniqueness_trend {
            Trend::Increased => writeln!(
                out,
                "- Uniqueness rate increased by {:.2} points",
                self.uniqueness_delta
            ),
            Trend::Decreased => writeln!(
                out,
                "- Uniqueness rate decreased by {:.2} points",
                self.uniqueness_delta.abs()
            ),
            Trend::Unchanged => writeln!(out, "- Uniqueness rate unchanged"),
        };
        out
    }

    fn summary_line(&self) -> String {
        format!(
            "entropy {:+.4} bits, uniqueness {:+.2} points",
            self.entropy_delta_bits, self.uniqueness_delta
        )
    }
}

impl Render for ConfigSnapshot {
    fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# fplink check\n");
        let _ = writeln!(out, "- Source: {}", self.config_source);
        if let Some(path) = &self.config_path {
            let _ = writeln!(out, "- Path: {}", path);
        }
        let _ = writeln!(out, "- Schema version: {}", self.schema_version);
        let _ = writeln!(out, "- Content hash: {}\n", self.short_id());
        let _ = writeln!(out, "## Weights\n");
        for (name, weight) in self.summary.weights.entries() {
            let _ = writeln!(out, "- {}: {:.2}", name, weight);
        }
        let t = &self.summary.thresholds;
        let _ = writeln!(out, "\n## Thresholds\n");
        let _ = writeln!(out, "- exact_match: {:.2}", t.exact_match);
        let _ = writeln!(out, "- same_device: {:.2}", t.same_device);
        let _ = writeln!(out, "- likely_same: {:.2}", t.likely_same);
        let _ = writeln!(out, "- possibly_same: {:.2}", t.possibly_same);
        let _ = writeln!(
            out,
            "\nRecent activity window: {}h",
            self.summary.recent_window_hours
        );
        out
    }

    fn summary_line(&self) -> String {
        format!("config ok ({}, {})", self.config_source, self.short_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::{analyze_entropy, compare_datasets};
    use crate::matcher::Matcher;
    use fl_common::{ComponentBag, HashComponent};

    #[test]
    fn test_comparison_markdown_lists_components() {
        let bag = ComponentBag {
            canvas: Some(HashComponent::new("c")),
            ..ComponentBag::default()
        };
        let md = Matcher::default().compare(&bag, &bag).to_markdown();
        assert!(md.contains("Similarity: 100.0%"));
        assert!(md.contains("| canvas | 1.000 |"));
        assert!(md.contains("| webgl | n/a |"));
    }

    #[test]
    fn test_empty_entropy_markdown_has_no_peak() {
        let md = analyze_entropy(&[]).to_markdown();
        assert!(md.contains("Total entries: 0"));
        assert!(!md.contains("Peak hour"));
        assert!(!md.contains("## Interpretation"));
    }

    #[test]
    fn test_unchanged_comparison_summary() {
        let report = analyze_entropy(&[]);
        let diff = compare_datasets(&report, &report);
        assert!(diff.to_markdown().contains("Entropy unchanged"));
        assert_eq!(diff.summary_line(), "entropy +0.0000 bits, uniqueness +0.00 points");
    }

    #[test]
    fn test_config_snapshot_markdown() {
        let md = ConfigSnapshot::defaults_only().to_markdown();
        assert!(md.contains("Source: builtin default"));
        assert!(md.contains("same_device: 0.85"));
        assert!(md.contains("Recent activity window: 24h"));
    }
}
