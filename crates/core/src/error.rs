//! Error types for r2dec settings.

use thiserror::Error;

/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingError>;

/// Error raised while parsing or validating a setting override.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingError {
    #[error("Expected 'key=value', got '{0}'")]
    MalformedAssignment(String),

    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    #[error("Setting '{key}' expects {expected}, got '{value}'")]
    InvalidValue {
        key: String,
        expected: &'static str,
        value: String,
    },
}
