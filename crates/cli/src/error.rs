//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// A connector reported a failed check
    #[error("{connector} check failed: {message}")]
    CheckFailed { connector: String, message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn check_failed(connector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CheckFailed {
            connector: connector.into(),
            message: message.into(),
        }
    }
}
