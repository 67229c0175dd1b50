//! Ordered frequency tables for categorical observations.
//!
//! Keys are kept in a `BTreeMap` so that iteration order, and therefore the
//! floating-point summation order of entropy, is identical across runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entropy::{entropy_bits, max_entropy, normalized_entropy};

/// Counts of how often each distinct key was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable<K: Ord> {
    counts: BTreeMap<K, u64>,
    total: u64,
}

impl<K: Ord> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }
}

impl<K: Ord> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of `key`.
    pub fn observe(&mut self, key: K) {
        self.observe_n(key, 1);
    }

    /// Record `n` observations of `key`. `n == 0` is a no-op.
    pub fn observe_n(&mut self, key: K, n: u64) {
        if n == 0 {
            return;
        }
        *self.counts.entry(key).or_insert(0) += n;
        self.total += n;
    }

    /// Number of times `key` was observed.
    pub fn count(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Total observations across all keys.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct keys with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterate `(key, count)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(k, c)| (k, *c))
    }

    /// Shannon entropy of this table over its own total.
    pub fn entropy(&self) -> f64 {
        entropy_bits(self.counts.values().copied(), self.total)
    }

    /// `log2(total)`: the entropy this table would have if every
    /// observation were distinct.
    pub fn max_entropy(&self) -> f64 {
        max_entropy(self.total)
    }

    pub fn normalized_entropy(&self) -> f64 {
        normalized_entropy(self.entropy(), self.total)
    }

    /// The key with the highest count; ties resolve to the smallest key.
    pub fn most_common(&self) -> Option<(&K, u64)> {
        let mut best: Option<(&K, u64)> = None;
        for (key, &count) in &self.counts {
            match best {
                Some((_, c)) if count <= c => {}
                _ => best = Some((key, count)),
            }
        }
        best
    }
}

impl<K: Ord> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<K: Ord> Extend<K> for FrequencyTable<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.observe(key);
        }
    }
}
