//! fplink engine configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for engine.json
//! - Config resolution (CLI → env → XDG → /etc → defaults)
//! - Semantic validation
//! - Config snapshots for run reports

pub mod engine;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use engine::{ActivityWindow, ComponentWeights, ConfidenceThresholds, EngineConfig};
pub use resolve::{resolve_config, ConfigPaths, ConfigSource};
pub use snapshot::ConfigSnapshot;
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
