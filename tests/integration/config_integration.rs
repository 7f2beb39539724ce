//! Configuration files driving the enricher.

use callsite_enricher::attributes::AttributeSet;
use callsite_enricher::config::{CallsiteConfig, ConfigLoader, ValidationError};
use callsite_enricher::enricher::{Enricher, EnrichmentOutcome};
use callsite_enricher::event::LogEvent;
use callsite_enricher::stack::FixedStack;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::Level;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("callsite.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_file_config_builds_enricher() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[logging]
level = "debug"
format = "json"

[logging.enrichment]
properties = ["Caller", "LineNumber", "StackTrace"]
minimum_level = "warning"
stack_trace_depth = 2
boundary = "billing::log::Facade"
"#,
    );

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.logging.level, "debug");

    let options = config.logging.enrichment.to_options().unwrap();
    assert_eq!(options.minimum_level, Level::WARN);
    assert_eq!(options.stack_trace_depth, 2);
    assert!(options.attributes.contains(callsite_enricher::Attribute::FileName));
    assert!(options.attributes.stack_trace);

    let enricher = Enricher::new(options)
        .unwrap()
        .with_introspector(Arc::new(FixedStack::from_symbols([
            "billing::log::Facade::warn",
            "billing::invoice::Invoice::finalize",
            "billing::main",
        ])));
    assert_eq!(enricher.boundary().as_str(), "billing::log::Facade");

    let mut info = LogEvent::new(Level::INFO, "billing");
    assert_eq!(enricher.enrich(&mut info), EnrichmentOutcome::Skipped);

    let mut warn = LogEvent::new(Level::WARN, "billing");
    assert_eq!(
        enricher.enrich(&mut warn),
        EnrichmentOutcome::Enriched { collected: 2 }
    );
    assert_eq!(
        warn.property("StackTrace").and_then(|v| v.as_str()),
        Some("billing.main > billing::invoice::Invoice.finalize")
    );
}

#[test]
fn test_missing_sections_use_defaults() {
    let config = ConfigLoader::load_from_str("[logging]\nlevel = \"warn\"\n").unwrap();
    let options = config.logging.enrichment.to_options().unwrap();
    assert_eq!(options.attributes, AttributeSet::CALLER);
    assert_eq!(options.minimum_level, Level::TRACE);
    assert_eq!(options.stack_trace_depth, 1);
}

#[test]
fn test_invalid_enrichment_is_reported_in_full() {
    let config = ConfigLoader::load_from_str(
        r#"
[logging.enrichment]
properties = ["Caller", "Nonsense"]
minimum_level = "loud"
stack_trace_depth = 0
"#,
    )
    .unwrap();

    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 3);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ValidationError::Enrichment(_))));
    assert!(config.logging.enrichment.to_options().is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = ConfigLoader::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_config_round_trips_through_toml() {
    let dir = TempDir::new().unwrap();
    let mut config = CallsiteConfig::default();
    config.logging.enrichment.stack_trace_depth = 3;
    config.logging.enrichment.properties = vec!["Source".to_string()];
    let path = write_config(&dir, &toml::to_string_pretty(&config).unwrap());

    let loaded = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(loaded.logging.enrichment, config.logging.enrichment);
}
