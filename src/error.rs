//! Error types for the call-site enrichment engine.

use thiserror::Error;

/// Configuration and setup errors.
///
/// Nothing in this enum is ever produced by the per-event enrichment call;
/// these surface only when an [`Enricher`](crate::enricher::Enricher) is built
/// or when configuration is loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnrichError {
    #[error("Invalid stack trace depth: {0} (must be between 1 and {max})", max = crate::enricher::MAX_STACK_TRACE_DEPTH)]
    InvalidDepth(i64),

    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Invalid boundary type: {0}")]
    InvalidBoundary(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Failure to capture the live call stack.
///
/// Internal to the introspection seam: the walker converts it into an empty
/// capture and a self-diagnostic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Stack frame access denied: {0}")]
    AccessDenied(String),
}

impl From<config::ConfigError> for EnrichError {
    fn from(err: config::ConfigError) -> Self {
        EnrichError::ConfigError(err.to_string())
    }
}
