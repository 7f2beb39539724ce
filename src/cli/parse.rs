//! CLI parse: clap types for the callsite tool. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Callsite CLI - inspect call-site stack-trace enrichment
#[derive(Parser)]
#[command(name = "callsite")]
#[command(about = "Call-site stack-trace enrichment for structured log events")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Attributes to enrich with, e.g. "Caller|LineNumber"
    #[arg(long)]
    pub properties: Option<String>,

    /// Least severe level to enrich
    #[arg(long)]
    pub min_level: Option<String>,

    /// Number of caller frames to project
    #[arg(long, allow_negative_numbers = true)]
    pub depth: Option<i64>,

    /// Explicit boundary type path
    #[arg(long)]
    pub boundary: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Emit sample events from nested call sites and print the enriched fields
    Demo {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Configuration commands (show, validate)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Validate the effective configuration
    Validate,
}
