//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::EnrichError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &EnrichError) -> String {
    match e {
        EnrichError::ConfigError(msg) => format!("configuration: {}", msg),
        other => other.to_string(),
    }
}
