//! Configuration loading and validation for fl-core.
//!
//! This module handles:
//! - Loading engine.json
//! - Config resolution order (CLI > env > XDG > /etc > defaults)
//! - Semantic validation (weights, threshold ordering, activity window)
//! - Config snapshot generation for reports

pub use fl_config::validate::ValidationError;
pub use fl_config::{ConfigPaths, ConfigSnapshot, ConfigSource, EngineConfig};

use fl_config::resolve::resolve_config;
use fl_config::validate::validate_engine_config;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit engine.json path (highest priority; must exist).
    pub config_path: Option<PathBuf>,
}

/// Resolved configuration with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The loaded engine configuration.
    pub engine: EngineConfig,
    /// Where it came from.
    pub paths: ConfigPaths,
    /// Raw file content (None when using defaults).
    pub raw_json: Option<String>,
}

impl ResolvedConfig {
    /// Built-in defaults with no file behind them.
    pub fn defaults() -> Self {
        ResolvedConfig {
            engine: EngineConfig::default(),
            paths: ConfigPaths::default(),
            raw_json: None,
        }
    }

    /// Whether a file was loaded.
    pub fn from_file(&self) -> bool {
        self.paths.engine.is_some()
    }

    /// Create a config snapshot for reports.
    pub fn snapshot(&self) -> ConfigSnapshot {
        if self.from_file() {
            ConfigSnapshot::new(&self.engine, &self.paths, self.raw_json.as_deref())
        } else {
            ConfigSnapshot::defaults_only()
        }
    }
}

/// Load configuration with the standard resolution order.
///
/// An explicit `config_path` that does not exist is an error rather than a
/// silent fall-through to defaults.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    if let Some(path) = &options.config_path {
        if !path.exists() {
            return Err(ConfigError::NotFound { path: path.clone() });
        }
    }

    let paths = resolve_config(options.config_path.as_deref());
    let Some(path) = paths.engine.clone() else {
        return Ok(ResolvedConfig::defaults());
    };

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::IoError {
        path: path.clone(),
        source,
    })?;
    let engine: EngineConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::ParseError {
            path: path.clone(),
            source,
        })?;

    validate_engine_config(&engine)?;

    Ok(ResolvedConfig {
        engine,
        paths,
        raw_json: Some(raw),
    })
}
