//! CLI presentation: enriched event and configuration formatters.

use crate::attributes::AttributeSet;
use crate::config::{CallsiteConfig, ValidationError};
use crate::error::EnrichError;
use crate::event::LogEvent;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

pub fn format_events_table(events: &[LogEvent]) -> String {
    if events.is_empty() {
        return "No events captured.".to_string();
    }

    let mut sections = Vec::with_capacity(events.len());
    for event in events {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Property", "Value"]);
        for (name, value) in event.properties() {
            table.add_row(vec![name.clone(), value.to_string()]);
        }
        sections.push(format!(
            "[{}] {}: {}\n{}",
            event.level,
            event.target,
            event.message.as_deref().unwrap_or(""),
            table
        ));
    }
    sections.join("\n\n")
}

pub fn format_events_json(events: &[LogEvent]) -> Result<String, EnrichError> {
    serde_json::to_string_pretty(events)
        .map_err(|e| EnrichError::ConfigError(format!("Failed to serialize events: {}", e)))
}

pub fn format_config_toml(config: &CallsiteConfig) -> Result<String, EnrichError> {
    let mut out = toml::to_string_pretty(config)
        .map_err(|e| EnrichError::ConfigError(format!("Failed to serialize config: {}", e)))?;
    if let Ok(options) = config.logging.enrichment.to_options() {
        out.push_str(&format!(
            "\n# normalized attributes: {}\n",
            describe_attributes(options.attributes)
        ));
    }
    Ok(out)
}

pub fn format_validation_result(result: &Result<(), Vec<ValidationError>>) -> String {
    match result {
        Ok(()) => "Configuration is valid.".to_string(),
        Err(errors) => {
            let mut s = format!("Configuration has {} error(s):", errors.len());
            for e in errors {
                s.push_str(&format!("\n  - {}", e));
            }
            s
        }
    }
}

fn describe_attributes(attributes: AttributeSet) -> String {
    let described = attributes.to_string();
    if attributes.needs_file_info() {
        format!("{} (resolves source locations)", described)
    } else {
        described
    }
}
