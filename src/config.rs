//! Configuration System
//!
//! Layered configuration for the enricher and the logging pipeline: built-in
//! defaults, an optional TOML file, then `CALLSITE_` environment variables
//! (`__` separates nested keys, e.g. `CALLSITE_LOGGING__ENRICHMENT__STACK_TRACE_DEPTH=3`).

use crate::attributes::AttributeSet;
use crate::boundary::BoundaryType;
use crate::enricher::{EnricherOptions, MAX_STACK_TRACE_DEPTH};
use crate::error::EnrichError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::Level;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "CALLSITE";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallsiteConfig {
    /// Logging pipeline, including enrichment
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Enrichment configuration as written in files and environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnricherConfig {
    /// Attribute names or shorthands, e.g. `["Caller", "LineNumber"]`
    #[serde(default = "default_properties")]
    pub properties: Vec<String>,

    /// Least severe level to enrich: trace, debug, info, warn, error
    #[serde(default = "default_minimum_level")]
    pub minimum_level: String,

    /// Frames to project starting at the caller (1 to 256)
    #[serde(default = "default_stack_trace_depth")]
    pub stack_trace_depth: i64,

    /// Explicit boundary type path; inferred from the dispatcher when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<String>,
}

fn default_properties() -> Vec<String> {
    vec!["Caller".to_string()]
}

fn default_minimum_level() -> String {
    "trace".to_string()
}

fn default_stack_trace_depth() -> i64 {
    1
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            properties: default_properties(),
            minimum_level: default_minimum_level(),
            stack_trace_depth: default_stack_trace_depth(),
            boundary: None,
        }
    }
}

/// Parse a level name. Accepts `tracing` names and the common aliases
/// `verbose`, `information`, `warning` and `fatal`.
pub fn parse_level(name: &str) -> Result<Level, EnrichError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "verbose" => Ok(Level::TRACE),
        "information" => Ok(Level::INFO),
        "warning" => Ok(Level::WARN),
        "fatal" => Ok(Level::ERROR),
        other => Level::from_str(other).map_err(|_| EnrichError::InvalidLevel(name.to_string())),
    }
}

impl EnricherConfig {
    /// Convert into validated enricher options.
    pub fn to_options(&self) -> Result<EnricherOptions, EnrichError> {
        let stack_trace_depth = usize::try_from(self.stack_trace_depth)
            .ok()
            .filter(|depth| (1..=MAX_STACK_TRACE_DEPTH).contains(depth))
            .ok_or(EnrichError::InvalidDepth(self.stack_trace_depth))?;

        let attributes = if self.properties.is_empty() {
            AttributeSet::DEFAULT
        } else {
            AttributeSet::parse_list(&self.properties)?
        };

        let boundary = self
            .boundary
            .as_deref()
            .map(BoundaryType::parse)
            .transpose()?;

        Ok(EnricherOptions {
            attributes,
            minimum_level: parse_level(&self.minimum_level)?,
            stack_trace_depth,
            boundary,
        })
    }

    /// Every problem with this configuration.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(1..=MAX_STACK_TRACE_DEPTH as i64).contains(&self.stack_trace_depth) {
            errors.push(EnrichError::InvalidDepth(self.stack_trace_depth).to_string());
        }
        for name in &self.properties {
            if let Err(e) = name.parse::<AttributeSet>() {
                errors.push(e.to_string());
            }
        }
        if let Err(e) = parse_level(&self.minimum_level) {
            errors.push(e.to_string());
        }
        if let Some(boundary) = &self.boundary {
            if let Err(e) = BoundaryType::parse(boundary) {
                errors.push(e.to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Logging(String),
    Enrichment(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
            ValidationError::Enrichment(msg) => write!(f, "Enrichment: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl CallsiteConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }
        if let Err(msgs) = self.logging.enrichment.validate() {
            errors.extend(msgs.into_iter().map(ValidationError::Enrichment));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Loads [`CallsiteConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults overlaid with `CALLSITE_` environment variables.
    pub fn load() -> Result<CallsiteConfig, EnrichError> {
        Self::build(None)
    }

    /// Defaults, then the TOML file at `path`, then environment variables.
    pub fn load_from_file(path: &Path) -> Result<CallsiteConfig, EnrichError> {
        if !path.exists() {
            return Err(EnrichError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Self::build(Some(path))
    }

    /// Parse configuration from a TOML string, without environment overrides.
    pub fn load_from_str(toml: &str) -> Result<CallsiteConfig, EnrichError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    fn build(path: Option<&Path>) -> Result<CallsiteConfig, EnrichError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("logging.enrichment.properties")
                .try_parsing(true),
        );
        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
