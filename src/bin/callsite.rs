//! Callsite CLI Binary
//!
//! Command-line interface for inspecting call-site stack-trace enrichment.

use anyhow::Context;
use callsite_enricher::cli::{map_error, Cli, RunContext};
use callsite_enricher::logging::init_logging;
use clap::Parser;
use std::process;
use tracing::{error, info};

fn main() {
    if let Err(e) = run() {
        eprintln!("{:#}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let context = RunContext::new(&cli)
        .map_err(|e| anyhow::anyhow!(map_error(&e)))
        .context("Failed to load configuration")?;

    // Invalid enrichment settings must still reach `config validate`, so a
    // logging setup failure is reported but not fatal.
    match init_logging(Some(&context.config().logging), context.consumer()) {
        Ok(enricher) => info!(
            boundary = %enricher.boundary(),
            depth = enricher.stack_trace_depth(),
            "Callsite CLI starting"
        ),
        Err(e) => eprintln!("Logging disabled: {}", map_error(&e)),
    }

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            Err(anyhow::anyhow!(map_error(&e)))
        }
    }
}
