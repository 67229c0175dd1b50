//! Engine facade: one configured entry point for every analysis.
//!
//! The engine is stateless between calls. Each analysis takes the full
//! record set (directly or as a repository snapshot) and recomputes.

use chrono::{DateTime, Duration, Utc};
use fl_common::{ComponentBag, FingerprintRecord, Result};
use fl_config::EngineConfig;

use crate::cluster::{cluster, DeviceGroup};
use crate::entropy::{analyze_entropy, EntropyReport};
use crate::log_event;
use crate::logging::{event_names, LogContext, Stage};
use crate::matcher::{Comparison, Matcher};
use crate::stats::{aggregate, AnalyticsSnapshot, DeviceStats};
use crate::store::FingerprintRepository;

#[derive(Debug, Clone)]
pub struct Engine {
    matcher: Matcher,
    recent_window: Duration,
    ctx: LogContext,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Engine {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            matcher: Matcher::from_config(config),
            // u32::MAX hours is well inside chrono's TimeDelta range.
            recent_window: Duration::hours(i64::from(config.activity.recent_window_hours)),
            ctx: LogContext::new(crate::logging::generate_run_id()),
        }
    }

    /// Tag this engine's events with a caller's run context.
    pub fn with_context(mut self, ctx: LogContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn recent_window(&self) -> Duration {
        self.recent_window
    }

    pub fn compare(&self, a: &ComponentBag, b: &ComponentBag) -> Comparison {
        self.matcher.compare(a, b)
    }

    pub fn cluster(&self, records: &[FingerprintRecord]) -> Vec<DeviceGroup> {
        log_event!(
            self.ctx,
            DEBUG,
            event_names::CLUSTER_STARTED,
            Stage::Cluster,
            "clustering records",
            records = records.len()
        );
        let groups = cluster(&self.matcher, records);
        log_event!(
            self.ctx,
            INFO,
            event_names::CLUSTER_FINISHED,
            Stage::Cluster,
            "clustering finished",
            records = records.len(),
            groups = groups.len()
        );
        groups
    }

    /// Cluster and aggregate. `now` anchors the recent-activity window.
    pub fn stats(&self, records: &[FingerprintRecord], now: DateTime<Utc>) -> DeviceStats {
        let groups = self.cluster(records);
        let stats = aggregate(&groups, records, now, self.recent_window);
        log_event!(
            self.ctx,
            INFO,
            event_names::AGGREGATE_FINISHED,
            Stage::Aggregate,
            "statistics aggregated",
            unique_devices = stats.unique_devices,
            returning_devices = stats.returning_devices,
            recent_activity = stats.recent_activity
        );
        stats
    }

    pub fn analytics(&self, records: &[FingerprintRecord], now: DateTime<Utc>) -> AnalyticsSnapshot {
        AnalyticsSnapshot::new(self.stats(records, now), records, now)
    }

    pub fn entropy(&self, records: &[FingerprintRecord]) -> EntropyReport {
        let report = analyze_entropy(records);
        log_event!(
            self.ctx,
            INFO,
            event_names::ENTROPY_FINISHED,
            Stage::Entropy,
            "entropy analyzed",
            entries = report.summary.total_entries,
            shannon_entropy = report.entropy.shannon_entropy
        );
        report
    }

    pub fn stats_from<R: FingerprintRepository + ?Sized>(
        &self,
        repo: &R,
        now: DateTime<Utc>,
    ) -> Result<DeviceStats> {
        Ok(self.stats(&repo.load_all()?, now))
    }

    pub fn analytics_from<R: FingerprintRepository + ?Sized>(
        &self,
        repo: &R,
        now: DateTime<Utc>,
    ) -> Result<AnalyticsSnapshot> {
        Ok(self.analytics(&repo.load_all()?, now))
    }

    pub fn entropy_from<R: FingerprintRepository + ?Sized>(&self, repo: &R) -> Result<EntropyReport> {
        Ok(self.entropy(&repo.load_all()?))
    }
}
