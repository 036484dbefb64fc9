//! Plugin error types.

use thiserror::Error;

/// Error type for plugin operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The interpreter hit an unrecoverable condition, such as an uncaught
    /// exception at the top level or an exhausted runtime limit.
    #[error("*** FATAL ERROR: {0}")]
    Fatal(String),

    /// A bridge global could not be installed.
    #[error("Failed to install bridge function '{name}': {reason}")]
    Bridge { name: &'static str, reason: String },

    /// Serializing the entry point arguments failed.
    #[error("Failed to encode entry point arguments: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for plugin operations.
pub type Result<T> = std::result::Result<T, PluginError>;
