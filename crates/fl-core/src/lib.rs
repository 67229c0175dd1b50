//! fplink core library.
//!
//! Fingerprint similarity and identity clustering:
//! - Similarity scoring and confidence classification
//! - Greedy, representative-anchored clustering into device groups
//! - Device statistics and analytics snapshots
//! - Shannon-entropy analysis of a record stream
//! - Record repositories (in-memory and JSON-lines log)
//!
//! The binary entry point is in `main.rs`.

pub mod cluster;
pub mod config;
pub mod engine;
pub mod entropy;
pub mod exit_codes;
pub mod logging;
pub mod matcher;
pub mod report;
pub mod schema;
pub mod stats;
pub mod store;

// Re-export test utilities for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cluster::{cluster, DeviceGroup};
pub use engine::Engine;
pub use entropy::{analyze_entropy, compare_datasets, DatasetComparison, EntropyReport};
pub use matcher::{Comparison, Confidence, Matcher};
pub use stats::{aggregate, AnalyticsSnapshot, DeviceStats, DeviceSummary};
pub use store::{FingerprintRepository, JsonlLogStore, MemoryRepository};
