//! JSON Schema generation for fplink input and output types.
//!
//! ```bash
//! fplink schema --list
//! fplink schema EntropyReport
//! fplink schema --all
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::entropy::{DatasetComparison, EntropyReport};
pub use crate::matcher::Comparison;
pub use crate::stats::{AnalyticsSnapshot, DeviceStats};
pub use fl_common::{ComponentBag, FingerprintRecord};
pub use fl_config::EngineConfig;

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        // Input types
        ("FingerprintRecord", "One observation as stored in the fingerprint log"),
        ("ComponentBag", "Fingerprint components captured in one observation"),
        ("EngineConfig", "engine.json: weights, thresholds, activity window"),
        // Output types
        ("Comparison", "Similarity, confidence, and per-component scores for a pair"),
        ("DeviceStats", "Device statistics over a clustered record set"),
        ("AnalyticsSnapshot", "Device statistics plus the latest records"),
        ("EntropyReport", "Shannon entropy analysis of a record set"),
        ("DatasetComparison", "Entropy and uniqueness change between two datasets"),
    ]
}

/// Generate JSON Schema for a type by name, or `None` if unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "FingerprintRecord" => schema_for!(FingerprintRecord),
        "ComponentBag" => schema_for!(ComponentBag),
        "EngineConfig" => schema_for!(EngineConfig),
        "Comparison" => schema_for!(Comparison),
        "DeviceStats" => schema_for!(DeviceStats),
        "AnalyticsSnapshot" => schema_for!(AnalyticsSnapshot),
        "EntropyReport" => schema_for!(EntropyReport),
        "DatasetComparison" => schema_for!(DatasetComparison),
        _ => return None,
    };

    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|schema| (name.to_string(), schema)))
        .collect()
}
