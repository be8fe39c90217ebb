//! Layered error definitions
//!
//! Categorized by source: config / resolution / backend / stream / staging

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Backend selection hints missing, ambiguous or unrecognized
    #[error("configuration error: {message}")]
    Configuration { message: String },

    // ===== Backend Errors =====
    /// Strategy construction failed
    #[error("failed to initialize backend '{backend}': {message}")]
    BackendInitialization { backend: String, message: String },

    // ===== Stream Errors =====
    /// Pacing delay interrupted by cancellation
    #[error("stream cancelled after {emitted} records")]
    StreamCancelled { emitted: u64 },

    // ===== Staging Errors =====
    /// Staging write error
    #[error("staging write error for stream '{stream}': {message}")]
    StagingWrite { stream: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create backend resolution error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create backend initialization error
    pub fn backend_initialization(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendInitialization {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create stream cancelled error
    pub fn stream_cancelled(emitted: u64) -> Self {
        Self::StreamCancelled { emitted }
    }

    /// Create staging write error
    pub fn staging_write(stream: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StagingWrite {
            stream: stream.into(),
            message: message.into(),
        }
    }

    /// Whether the host may retry the failed operation as-is
    ///
    /// Cancellation and configuration problems need outside intervention.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::BackendInitialization { .. } | Self::Io(_))
    }
}
