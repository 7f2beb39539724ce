//! Integration tests for call-site stack-trace enrichment

mod boundary_resolution;
mod cli_commands;
mod config_integration;
mod test_utils;
