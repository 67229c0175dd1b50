//! Greedy, representative-anchored clustering of fingerprint records.
//!
//! Records are visited in arrival order. Each record is scored against the
//! representative (first member) of every existing group, in creation order,
//! and joins the first group that reaches the same-device cutoff. A record
//! that matches nothing opens a new group and becomes its representative.
//!
//! Assignment is final: a record is never moved, and representatives never
//! change. This makes the result order-dependent and non-transitive (A~B and
//! B~C does not put A and C together), and costs O(n*k) comparisons.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use fl_common::{DeviceId, FingerprintRecord, SessionId};

use crate::logging::event_names;
use crate::matcher::Matcher;

/// One inferred device: indices into the clustered record slice.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceGroup {
    pub device_id: DeviceId,
    /// Member record indices in arrival order; `members[0]` is the representative.
    pub members: Vec<usize>,
    pub sessions: BTreeSet<SessionId>,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl DeviceGroup {
    fn open(ordinal: usize, index: usize, record: &FingerprintRecord) -> Self {
        let mut sessions = BTreeSet::new();
        sessions.insert(record.session_id.clone());
        Self {
            device_id: DeviceId::sequential(ordinal),
            members: vec![index],
            sessions,
            first_seen: record.server_timestamp,
            last_seen: record.server_timestamp,
        }
    }

    fn push(&mut self, index: usize, record: &FingerprintRecord) {
        self.members.push(index);
        self.sessions.insert(record.session_id.clone());
        self.first_seen = self.first_seen.min(record.server_timestamp);
        self.last_seen = self.last_seen.max(record.server_timestamp);
    }

    /// Index of the representative record.
    pub fn representative(&self) -> usize {
        self.members[0]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Seen more than once.
    pub fn is_returning(&self) -> bool {
        self.members.len() > 1
    }

    /// Member records resolved against the slice the group was built from.
    pub fn records<'a>(
        &'a self,
        records: &'a [FingerprintRecord],
    ) -> impl Iterator<Item = &'a FingerprintRecord> + 'a {
        self.members.iter().filter_map(move |&i| records.get(i))
    }
}

/// Partition `records` into device groups. Deterministic for a given order.
pub fn cluster(matcher: &Matcher, records: &[FingerprintRecord]) -> Vec<DeviceGroup> {
    let mut groups: Vec<DeviceGroup> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let target = groups.iter().position(|group| {
            let representative = &records[group.representative()];
            matcher.is_same_device(&record.components, &representative.components)
        });

        match target {
            Some(g) => groups[g].push(index, record),
            None => {
                let group = DeviceGroup::open(groups.len() + 1, index, record);
                tracing::debug!(
                    target: event_names::CLUSTER_GROUP_CREATED,
                    device_id = %group.device_id,
                    record = index,
                    "new device group"
                );
                groups.push(group);
            }
        }
    }

    groups
}
