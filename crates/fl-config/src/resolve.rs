//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path → /etc → defaults.

use std::path::{Path, PathBuf};

/// Discovered configuration file path.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Path to engine.json (or None if not found).
    pub engine: Option<PathBuf>,

    /// Where engine.json came from (for diagnostics).
    pub engine_source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/fplink/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "FPLINK_CONFIG";
pub const ENV_CONFIG_DIR: &str = "FPLINK_CONFIG_DIR";

/// Standard config file name.
pub const ENGINE_FILENAME: &str = "engine.json";

/// Application name for XDG directories.
const APP_NAME: &str = "fplink";

/// Resolve the engine configuration path.
///
/// 1. Explicit CLI path (if it exists)
/// 2. `FPLINK_CONFIG`
/// 3. `FPLINK_CONFIG_DIR` + engine.json
/// 4. XDG config directory (~/.config/fplink/)
/// 5. System config (/etc/fplink/)
/// 6. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPaths {
    let mut paths = ConfigPaths::default();
    paths.engine = resolve_single_config(cli_path, &mut paths.engine_source);
    paths
}

fn resolve_single_config(cli_path: Option<&Path>, source: &mut ConfigSource) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        if path.exists() {
            *source = ConfigSource::CliArgument;
            return Some(path.to_path_buf());
        }
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            *source = ConfigSource::Environment;
            return Some(path);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(ENGINE_FILENAME);
        if path.exists() {
            *source = ConfigSource::Environment;
            return Some(path);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(ENGINE_FILENAME);
        if path.exists() {
            *source = ConfigSource::XdgConfig;
            return Some(path);
        }
    }

    let system_path = system_config_dir().join(ENGINE_FILENAME);
    if system_path.exists() {
        *source = ConfigSource::SystemConfig;
        return Some(system_path);
    }

    *source = ConfigSource::BuiltinDefault;
    None
}

/// Get the XDG config directory for fplink.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::CliArgument), "CLI argument");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(
            format!("{}", ConfigSource::BuiltinDefault),
            "builtin default"
        );
    }

    #[test]
    fn test_missing_cli_path_falls_through() {
        let paths = resolve_config(Some(Path::new("/nonexistent/fplink/engine.json")));
        assert_ne!(paths.engine_source, ConfigSource::CliArgument);
    }

    #[test]
    fn test_xdg_config_dir() {
        if let Some(path) = xdg_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }

    #[test]
    fn test_system_config_dir() {
        assert_eq!(system_config_dir(), PathBuf::from("/etc/fplink"));
    }
}
