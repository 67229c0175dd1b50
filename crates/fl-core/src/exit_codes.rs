//! Exit codes for the fplink CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0-2: Operational outcomes
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

/// Exit codes for fplink operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Operational Outcomes (0-2)
    // ========================================================================
    /// Success
    Clean = 0,

    /// Compared fingerprints are not the same device
    NoMatch = 1,

    /// Dataset contains no records
    EmptyDataset = 2,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments
    ArgsError = 10,

    /// Engine configuration missing, unparsable, or invalid
    ConfigError = 11,

    /// Input fingerprint or log could not be read or parsed
    InputError = 12,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Operational outcome rather than an error (codes 0-9).
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    /// User/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Any error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Stable name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::NoMatch => "OK_NO_MATCH",
            ExitCode::EmptyDataset => "OK_EMPTY",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&fl_common::Error> for ExitCode {
    fn from(err: &fl_common::Error) -> Self {
        use fl_common::error::ErrorCategory;
        match err.category() {
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Ingest => ExitCode::InputError,
            ErrorCategory::Dataset => ExitCode::EmptyDataset,
            ErrorCategory::Io => match err {
                fl_common::Error::Json(_) => ExitCode::InputError,
                _ => ExitCode::IoError,
            },
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_stable() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::NoMatch.as_i32(), 1);
        assert_eq!(ExitCode::EmptyDataset.as_i32(), 2);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::ConfigError.as_i32(), 11);
        assert_eq!(ExitCode::InputError.as_i32(), 12);
        assert_eq!(ExitCode::InternalError.as_i32(), 20);
        assert_eq!(ExitCode::IoError.as_i32(), 21);
    }

    #[test]
    fn test_ranges() {
        assert!(ExitCode::NoMatch.is_operational());
        assert!(!ExitCode::NoMatch.is_error());
        assert!(ExitCode::ConfigError.is_user_error());
        assert!(ExitCode::IoError.is_error());
        assert!(!ExitCode::IoError.is_user_error());
    }

    #[test]
    fn test_from_error() {
        assert_eq!(
            ExitCode::from(&fl_common::Error::InvalidPayload("x".into())),
            ExitCode::InputError
        );
        assert_eq!(
            ExitCode::from(&fl_common::Error::EmptyDataset),
            ExitCode::EmptyDataset
        );
        let io = fl_common::Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "x"));
        assert_eq!(ExitCode::from(&io), ExitCode::IoError);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::NoMatch.to_string(), "OK_NO_MATCH (1)");
    }
}
