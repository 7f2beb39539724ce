//! CLI route: single route table and run context.

use crate::cli::parse::{Cli, Commands, ConfigCommands};
use crate::cli::presentation::{
    format_config_toml, format_events_json, format_events_table, format_validation_result,
};
use crate::config::{CallsiteConfig, ConfigLoader};
use crate::consumer::MemoryConsumer;
use crate::error::EnrichError;

/// Runtime context for CLI execution: effective configuration and the
/// consumer that receives enriched events.
pub struct RunContext {
    config: CallsiteConfig,
    consumer: MemoryConsumer,
}

impl RunContext {
    /// Load configuration from `--config` (or defaults and environment) and
    /// apply command-line overrides.
    pub fn new(cli: &Cli) -> Result<Self, EnrichError> {
        let mut config = match cli.config {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        apply_overrides(&mut config, cli);
        Ok(Self {
            config,
            consumer: MemoryConsumer::new(),
        })
    }

    pub fn config(&self) -> &CallsiteConfig {
        &self.config
    }

    /// Consumer to install in the logging pipeline.
    pub fn consumer(&self) -> MemoryConsumer {
        self.consumer.clone()
    }

    pub fn execute(&self, command: &Commands) -> Result<String, EnrichError> {
        match command {
            Commands::Demo { format } => self.run_demo(format),
            Commands::Config { command } => match command {
                ConfigCommands::Show => format_config_toml(&self.config),
                ConfigCommands::Validate => {
                    let result = self.config.validate();
                    let text = format_validation_result(&result);
                    match result {
                        Ok(()) => Ok(text),
                        Err(_) => Err(EnrichError::ConfigError(text)),
                    }
                }
            },
        }
    }

    fn run_demo(&self, format: &str) -> Result<String, EnrichError> {
        self.consumer.drain();
        demo::sign_in("alice", "portal");
        let events = self.consumer.drain();
        match format {
            "json" => format_events_json(&events),
            "table" => Ok(format_events_table(&events)),
            other => Err(EnrichError::ConfigError(format!(
                "Invalid output format: {} (must be 'table' or 'json')",
                other
            ))),
        }
    }
}

fn apply_overrides(config: &mut CallsiteConfig, cli: &Cli) {
    let logging = &mut config.logging;
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref properties) = cli.properties {
        logging.enrichment.properties = vec![properties.clone()];
    }
    if let Some(ref min_level) = cli.min_level {
        logging.enrichment.minimum_level = min_level.clone();
    }
    if let Some(depth) = cli.depth {
        logging.enrichment.stack_trace_depth = depth;
    }
    if let Some(ref boundary) = cli.boundary {
        logging.enrichment.boundary = Some(boundary.clone());
    }
}

/// Nested sample call sites for `callsite demo`.
mod demo {
    use tracing::{debug, info, warn};

    #[inline(never)]
    pub fn sign_in(user: &str, client: &str) {
        info!(user, "sign-in started");
        let token = issue_token(client);
        debug!(token_len = token.len(), "sign-in completed");
    }

    #[inline(never)]
    fn issue_token(client: &str) -> String {
        warn!(client, "issuing token with short lifetime");
        format!("{}-token", client)
    }
}
