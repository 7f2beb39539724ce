//! Shared fixtures for integration tests.

use callsite_enricher::attributes::AttributeSet;
use callsite_enricher::consumer::MemoryConsumer;
use callsite_enricher::enricher::{Enricher, EnricherOptions};
use callsite_enricher::layer::EnrichmentLayer;
use callsite_enricher::stack::FixedStack;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

pub const DISPATCH: &str = "tracing_core::event::Event::dispatch";

/// Enrichment machinery, two dispatch frames, then `callers` innermost first.
pub fn facade_stack(callers: &[&str]) -> FixedStack {
    let mut symbols = vec![
        "callsite_enricher::stack::walker::StackWalker::collect".to_string(),
        "callsite_enricher::enricher::Enricher::enrich".to_string(),
        DISPATCH.to_string(),
        DISPATCH.to_string(),
    ];
    symbols.extend(callers.iter().map(|s| s.to_string()));
    FixedStack::from_symbols(symbols)
}

pub fn options(attributes: AttributeSet, depth: usize, minimum_level: Level) -> EnricherOptions {
    EnricherOptions {
        attributes,
        minimum_level,
        stack_trace_depth: depth,
        boundary: None,
    }
}

/// Run `f` under a subscriber whose only layer enriches into the returned consumer.
pub fn capture_with<F: FnOnce()>(enricher: Enricher, f: F) -> MemoryConsumer {
    let consumer = MemoryConsumer::new();
    let layer = EnrichmentLayer::new(Arc::new(enricher), consumer.clone());
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    consumer
}
