//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::engine::{ConfidenceThresholds, EngineConfig};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Largest accepted activity window: 100 years of hours.
pub const MAX_RECENT_WINDOW_HOURS: u32 = 876_000;

/// Validate an engine configuration semantically.
pub fn validate_engine_config(config: &EngineConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    for (name, weight) in config.weights.entries() {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("weights.{}", name),
                message: format!("Must be finite and >= 0, got {}", weight),
            });
        }
    }

    let total = config.weights.total();
    if !total.is_finite() || total <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "weights".to_string(),
            message: format!("weights must have a finite positive sum, got {}", total),
        });
    }

    validate_thresholds(&config.thresholds)?;

    let window = config.activity.recent_window_hours;
    if window == 0 || window > MAX_RECENT_WINDOW_HOURS {
        return Err(ValidationError::InvalidValue {
            field: "activity.recent_window_hours".to_string(),
            message: format!("must be in 1..={}, got {}", MAX_RECENT_WINDOW_HOURS, window),
        });
    }

    Ok(())
}

fn validate_thresholds(t: &ConfidenceThresholds) -> ValidationResult<()> {
    let ordered = [
        ("exact_match", t.exact_match),
        ("same_device", t.same_device),
        ("likely_same", t.likely_same),
        ("possibly_same", t.possibly_same),
    ];

    for (name, value) in ordered {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::InvalidValue {
                field: format!("thresholds.{}", name),
                message: format!("Must be in [0, 1], got {}", value),
            });
        }
    }

    for pair in ordered.windows(2) {
        let (upper_name, upper) = pair[0];
        let (lower_name, lower) = pair[1];
        if lower > upper {
            return Err(ValidationError::SemanticError(format!(
                "thresholds must be non-increasing: {}={} exceeds {}={}",
                lower_name, lower, upper_name, upper
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        validate_engine_config(&EngineConfig::default()).unwrap();
    }

    #[test]
    fn test_rejects_version_mismatch() {
        let config = EngineConfig {
            schema_version: "0.9.0".to_string(),
            ..EngineConfig::default()
        };
        let err = validate_engine_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::VersionMismatch { .. }));
        assert_eq!(err.code(), 66);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let mut config = EngineConfig::default();
        config.weights.audio = -0.1;
        let err = validate_engine_config(&config).unwrap_err();
        match err {
            ValidationError::InvalidValue { field, .. } => assert_eq!(field, "weights.audio"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_nan_weight() {
        let mut config = EngineConfig::default();
        config.weights.canvas = f64::NAN;
        assert!(validate_engine_config(&config).is_err());
    }

    #[test]
    fn test_rejects_all_zero_weights() {
        let mut config = EngineConfig::default();
        config.weights = crate::ComponentWeights {
            canvas: 0.0,
            webgl: 0.0,
            audio: 0.0,
            browser: 0.0,
            hardware_stable: 0.0,
            hardware_dynamic: 0.0,
        };
        assert!(validate_engine_config(&config).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let mut config = EngineConfig::default();
        config.thresholds.exact_match = 1.5;
        let err = validate_engine_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let mut config = EngineConfig::default();
        config.thresholds.likely_same = 0.9;
        let err = validate_engine_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::SemanticError(_)));
        assert!(err.to_string().contains("likely_same"));
    }

    #[test]
    fn test_rejects_zero_window() {
        let mut config = EngineConfig::default();
        config.activity.recent_window_hours = 0;
        assert!(validate_engine_config(&config).is_err());
    }

    #[test]
    fn test_rejects_window_beyond_cap() {
        let mut config = EngineConfig::default();
        config.activity.recent_window_hours = MAX_RECENT_WINDOW_HOURS;
        validate_engine_config(&config).unwrap();

        config.activity.recent_window_hours = 2_500_000_000;
        let err = validate_engine_config(&config).unwrap_err();
        match err {
            ValidationError::InvalidValue { field, .. } => {
                assert_eq!(field, "activity.recent_window_hours")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_overflowing_weight_sum() {
        let mut config = EngineConfig::default();
        config.weights.canvas = 1e308;
        config.weights.audio = 1e308;
        let err = validate_engine_config(&config).unwrap_err();
        match err {
            ValidationError::InvalidValue { field, .. } => assert_eq!(field, "weights"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
