//! Statistics over a device partition.

use chrono::{DateTime, Duration, Utc};
use fl_common::{DeviceId, FingerprintRecord};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cluster::DeviceGroup;

/// Number of records listed in [`AnalyticsSnapshot::recent_fingerprints`].
pub const RECENT_FINGERPRINTS: usize = 10;

/// Summary of one device group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    pub device_id: DeviceId,
    pub fingerprint_count: usize,
    pub session_count: usize,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl From<&DeviceGroup> for DeviceSummary {
    fn from(group: &DeviceGroup) -> Self {
        Self {
            device_id: group.device_id.clone(),
            fingerprint_count: group.len(),
            session_count: group.sessions.len(),
            first_seen: group.first_seen,
            last_seen: group.last_seen,
        }
    }
}

/// Device-level statistics for a record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStats {
    pub total_fingerprints: usize,
    pub unique_devices: usize,
    /// Groups with more than one member.
    pub returning_devices: usize,
    /// Rounded to two decimals; 0 when there are no devices.
    pub average_collections_per_device: f64,
    /// Records received strictly after `now - window`.
    pub recent_activity: usize,
    pub device_groups: Vec<DeviceSummary>,
}

/// Aggregate a partition produced by [`crate::cluster::cluster`].
pub fn aggregate(
    groups: &[DeviceGroup],
    records: &[FingerprintRecord],
    now: DateTime<Utc>,
    window: Duration,
) -> DeviceStats {
    let total = records.len();
    let unique = groups.len();
    let cutoff = now
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    DeviceStats {
        total_fingerprints: total,
        unique_devices: unique,
        returning_devices: groups.iter().filter(|g| g.is_returning()).count(),
        average_collections_per_device: if unique == 0 {
            0.0
        } else {
            round2(total as f64 / unique as f64)
        },
        recent_activity: records
            .iter()
            .filter(|r| r.server_timestamp > cutoff)
            .count(),
        device_groups: groups.iter().map(DeviceSummary::from).collect(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Listing entry for a recently received record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentFingerprint {
    /// Truncated record id.
    pub id: String,
    pub timestamp: DateTime<Utc>,
}

/// Dashboard view: device statistics plus the latest records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    #[serde(flatten)]
    pub stats: DeviceStats,
    /// The last records in arrival order, oldest first.
    pub recent_fingerprints: Vec<RecentFingerprint>,
    pub last_updated: DateTime<Utc>,
}

impl AnalyticsSnapshot {
    pub fn new(stats: DeviceStats, records: &[FingerprintRecord], now: DateTime<Utc>) -> Self {
        let start = records.len().saturating_sub(RECENT_FINGERPRINTS);
        let recent_fingerprints = records[start..]
            .iter()
            .map(|r| RecentFingerprint {
                id: r.id.short(),
                timestamp: r.server_timestamp,
            })
            .collect();

        Self {
            stats,
            recent_fingerprints,
            last_updated: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::cluster;
    use crate::matcher::Matcher;
    use chrono::TimeZone;
    use fl_common::{ComponentBag, HashComponent, RecordId, SessionId};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap()
    }

    fn record(n: usize, canvas: &str, hours_ago: i64) -> FingerprintRecord {
        FingerprintRecord::new(
            RecordId(format!("{n:064x}")),
            SessionId(format!("s{n}")),
            now() - Duration::hours(hours_ago),
            ComponentBag {
                canvas: Some(HashComponent::new(canvas)),
                ..ComponentBag::default()
            },
        )
    }

    #[test]
    fn test_empty_aggregate() {
        let stats = aggregate(&[], &[], now(), Duration::hours(24));
        assert_eq!(stats.total_fingerprints, 0);
        assert_eq!(stats.unique_devices, 0);
        assert_eq!(stats.returning_devices, 0);
        assert_eq!(stats.average_collections_per_device, 0.0);
        assert_eq!(stats.recent_activity, 0);
        assert!(stats.device_groups.is_empty());
    }

    #[test]
    fn test_counts_and_average() {
        let records = vec![
            record(0, "A", 30),
            record(1, "A", 2),
            record(2, "B", 1),
            record(3, "C", 48),
            record(4, "A", 0),
            record(5, "B", 0),
            record(6, "D", 5),
        ];
        let groups = cluster(&Matcher::default(), &records);
        let stats = aggregate(&groups, &records, now(), Duration::hours(24));

        assert_eq!(stats.total_fingerprints, 7);
        assert_eq!(stats.unique_devices, 4);
        assert_eq!(stats.returning_devices, 2);
        assert_eq!(stats.average_collections_per_device, 1.75);
        assert_eq!(stats.recent_activity, 5);
        assert_eq!(stats.device_groups[0].fingerprint_count, 3);
        assert_eq!(stats.device_groups[0].session_count, 3);
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let records = vec![record(0, "A", 1), record(1, "A", 1), record(2, "B", 1)];
        let groups = cluster(&Matcher::default(), &records);
        let stats = aggregate(&groups, &records, now(), Duration::hours(24));
        assert_eq!(stats.average_collections_per_device, 1.5);

        assert_eq!(round2(7.0 / 3.0), 2.33);
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let records = vec![record(0, "A", 24)];
        let groups = cluster(&Matcher::default(), &records);
        let stats = aggregate(&groups, &records, now(), Duration::hours(24));
        assert_eq!(stats.recent_activity, 0);
    }

    #[test]
    fn test_huge_window_counts_everything() {
        let records = vec![record(0, "A", 0), record(1, "B", 87_600)];
        let groups = cluster(&Matcher::default(), &records);
        let window = Duration::hours(i64::from(u32::MAX));
        let stats = aggregate(&groups, &records, now(), window);
        assert_eq!(stats.recent_activity, 2);
    }

    #[test]
    fn test_analytics_keeps_last_ten() {
        let records: Vec<_> = (0..12).map(|n| record(n, "A", 12 - n as i64)).collect();
        let groups = cluster(&Matcher::default(), &records);
        let stats = aggregate(&groups, &records, now(), Duration::hours(24));
        let snapshot = AnalyticsSnapshot::new(stats, &records, now());

        assert_eq!(snapshot.recent_fingerprints.len(), RECENT_FINGERPRINTS);
        assert_eq!(snapshot.recent_fingerprints[0].timestamp, records[2].server_timestamp);
        assert!(snapshot.recent_fingerprints[0].id.ends_with("..."));
        assert_eq!(snapshot.recent_fingerprints[0].id.len(), 19);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["totalFingerprints"], 12);
        assert!(json["lastUpdated"].is_string());
    }
}
