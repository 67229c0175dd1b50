//! Hourly distribution of record arrivals.

use chrono::{DateTime, Utc};
use fl_math::FrequencyTable;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Bucket key format: the timestamp truncated to the hour.
const HOUR_FORMAT: &str = "%Y-%m-%dT%H";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HourBucket {
    /// `YYYY-MM-DDTHH` (UTC).
    pub hour: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemporalDistribution {
    /// Buckets in chronological order.
    pub hourly_distribution: Vec<HourBucket>,
    /// Busiest bucket; the earliest one on ties. `None` with no records.
    pub peak_hour: Option<HourBucket>,
    pub average_per_hour: f64,
}

impl TemporalDistribution {
    pub fn from_timestamps<'a, I>(timestamps: I) -> Self
    where
        I: IntoIterator<Item = &'a DateTime<Utc>>,
    {
        let buckets: FrequencyTable<String> = timestamps
            .into_iter()
            .map(|ts| ts.format(HOUR_FORMAT).to_string())
            .collect();

        // Keys sort chronologically, so the smallest-key tie break is the
        // earliest hour.
        let peak_hour = buckets.most_common().map(|(hour, count)| HourBucket {
            hour: hour.clone(),
            count,
        });

        let hourly_distribution: Vec<HourBucket> = buckets
            .iter()
            .map(|(hour, count)| HourBucket {
                hour: hour.clone(),
                count,
            })
            .collect();

        let average_per_hour = if hourly_distribution.is_empty() {
            0.0
        } else {
            buckets.total() as f64 / hourly_distribution.len() as f64
        };

        Self {
            hourly_distribution,
            peak_hour,
            average_per_hour,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, h, m, 0).unwrap()
    }

    #[test]
    fn test_empty() {
        let none: [DateTime<Utc>; 0] = [];
        let t = TemporalDistribution::from_timestamps(&none);
        assert!(t.hourly_distribution.is_empty());
        assert!(t.peak_hour.is_none());
        assert_eq!(t.average_per_hour, 0.0);
    }

    #[test]
    fn test_buckets_sorted_with_peak() {
        let ts = [at(14, 5), at(9, 0), at(14, 59), at(9, 30), at(14, 10), at(11, 0)];
        let t = TemporalDistribution::from_timestamps(&ts);
        let hours: Vec<_> = t.hourly_distribution.iter().map(|b| b.hour.as_str()).collect();
        assert_eq!(hours, vec!["2024-05-10T09", "2024-05-10T11", "2024-05-10T14"]);
        assert_eq!(
            t.peak_hour,
            Some(HourBucket {
                hour: "2024-05-10T14".to_string(),
                count: 3
            })
        );
        assert_eq!(t.average_per_hour, 2.0);
    }

    #[test]
    fn test_peak_ties_go_to_earliest() {
        let ts = [at(10, 0), at(8, 0)];
        let t = TemporalDistribution::from_timestamps(&ts);
        assert_eq!(t.peak_hour.unwrap().hour, "2024-05-10T08");
    }
}
