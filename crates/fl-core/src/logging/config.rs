//! Logging configuration.
//!
//! Precedence, lowest to highest: built-in default (`warn`, human),
//! `RUST_LOG` directives, `FPLINK_LOG` / `FPLINK_LOG_FORMAT`, CLI flags.
//!
//! Event names double as tracing targets, so `RUST_LOG` can single out one
//! stage, e.g. `RUST_LOG=cluster.group_created=debug`.

use serde::{Deserialize, Serialize};

/// Log level override; wins over `RUST_LOG`.
pub const ENV_LOG_LEVEL: &str = "FPLINK_LOG";
/// `human` or `jsonl`.
pub const ENV_LOG_FORMAT: &str = "FPLINK_LOG_FORMAT";

/// Log output format. Both write to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event, for pipelines that already consume
    /// `--format json` payloads.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            other => Err(format!("unknown log format '{}' (expected human or jsonl)", other)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LogFormat::Human => "human",
            LogFormat::Jsonl => "jsonl",
        })
    }
}

/// Minimum level that reaches the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Off,
}

/// Accepted spellings, first entry per level is canonical.
const LEVEL_NAMES: &[(&str, LogLevel)] = &[
    ("trace", LogLevel::Trace),
    ("debug", LogLevel::Debug),
    ("info", LogLevel::Info),
    ("warn", LogLevel::Warn),
    ("warning", LogLevel::Warn),
    ("error", LogLevel::Error),
    ("off", LogLevel::Off),
    ("quiet", LogLevel::Off),
];

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        LEVEL_NAMES
            .iter()
            .find(|(_, level)| level == self)
            .map(|(name, _)| *name)
            .unwrap_or("warn")
    }

    /// Level selected by `-v` repetitions and `-q`; `None` leaves the
    /// environment in charge.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Option<Self> {
        if quiet {
            return Some(LogLevel::Error);
        }
        match verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LEVEL_NAMES
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, level)| *level)
            .ok_or_else(|| format!("unknown log level '{}'", s))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        use tracing_subscriber::filter::LevelFilter;
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

/// Effective logging setup for one process.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Raw `RUST_LOG` directives, used only when no explicit level was given.
    pub directives: Option<String>,
    /// Timestamps on human output.
    pub timestamps: bool,
}

impl LogConfig {
    /// Layer the environment and CLI overrides over the defaults.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::resolve(
            std::env::var(ENV_LOG_LEVEL).ok().as_deref(),
            std::env::var(ENV_LOG_FORMAT).ok().as_deref(),
            std::env::var("RUST_LOG").ok(),
            cli_level,
            cli_format,
        )
    }

    /// Setup for the `fplink` binary: `-v`/`-q` pick the level and machine
    /// payloads get machine logs.
    pub fn for_cli(verbose: u8, quiet: bool, machine_output: bool) -> Self {
        Self::from_env(
            LogLevel::from_verbosity(verbose, quiet),
            machine_output.then_some(LogFormat::Jsonl),
        )
    }

    fn resolve(
        env_level: Option<&str>,
        env_format: Option<&str>,
        rust_log: Option<String>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let explicit_level = cli_level.or_else(|| env_level.and_then(|v| v.parse().ok()));
        let format = cli_format
            .or_else(|| env_format.and_then(|v| v.parse().ok()))
            .unwrap_or_default();

        LogConfig {
            format,
            level: explicit_level.unwrap_or_default(),
            directives: match explicit_level {
                Some(_) => None,
                None => rust_log.filter(|d| !d.trim().is_empty()),
            },
            timestamps: true,
        }
    }

    /// Filter string handed to `EnvFilter`.
    pub fn filter_directives(&self) -> String {
        self.directives
            .clone()
            .unwrap_or_else(|| self.level.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert_eq!("JSONL".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_level_names_round_trip() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
            LogLevel::Off,
        ] {
            assert_eq!(level.as_str().parse::<LogLevel>().unwrap(), level);
        }
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("quiet".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(LogLevel::from_verbosity(0, false), None);
        assert_eq!(LogLevel::from_verbosity(1, false), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_verbosity(2, false), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_verbosity(5, false), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_verbosity(3, true), Some(LogLevel::Error));
    }

    #[test]
    fn test_defaults_are_quiet_human() {
        let config = LogConfig::resolve(None, None, None, None, None);
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Human);
        assert_eq!(config.filter_directives(), "warn");
    }

    #[test]
    fn test_rust_log_directives_pass_through() {
        let config = LogConfig::resolve(
            None,
            None,
            Some("cluster.group_created=debug".to_string()),
            None,
            None,
        );
        assert_eq!(config.filter_directives(), "cluster.group_created=debug");
    }

    #[test]
    fn test_explicit_level_beats_rust_log() {
        let config = LogConfig::resolve(Some("error"), None, Some("trace".to_string()), None, None);
        assert_eq!(config.filter_directives(), "error");

        let config = LogConfig::resolve(
            Some("error"),
            Some("human"),
            None,
            Some(LogLevel::Debug),
            Some(LogFormat::Jsonl),
        );
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Jsonl);
    }

    #[test]
    fn test_unparseable_env_values_are_ignored() {
        let config = LogConfig::resolve(Some("loud"), Some("xml"), None, None, None);
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Human);
    }
}
