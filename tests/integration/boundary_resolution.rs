//! Boundary configuration, inference and publication.

use super::test_utils::options;
use callsite_enricher::attributes::AttributeSet;
use callsite_enricher::boundary::{ActiveSink, BoundaryType};
use callsite_enricher::enricher::{Enricher, EnricherOptions, EnrichmentOutcome};
use callsite_enricher::event::LogEvent;
use callsite_enricher::stack::FixedStack;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use tracing::Level;

const MODULE: &str = "integration_tests::integration::boundary_resolution";

struct AuditLogger;

struct CountingSink {
    calls: AtomicUsize,
    boundary: &'static str,
}

impl ActiveSink for CountingSink {
    fn boundary_type(&self) -> BoundaryType {
        self.calls.fetch_add(1, Ordering::SeqCst);
        BoundaryType::new(self.boundary)
    }
}

fn audit_stack() -> FixedStack {
    FixedStack::from_symbols([
        "callsite_enricher::enricher::Enricher::enrich".to_string(),
        format!("{}::AuditLogger::write", MODULE),
        format!("{}::AuditLogger::info", MODULE),
        "billing::invoice::Invoice::finalize".to_string(),
    ])
}

fn method_of(event: &LogEvent) -> Option<String> {
    event
        .property("MethodName")
        .and_then(|v| v.as_str())
        .map(String::from)
}

#[test]
fn test_default_boundary_is_the_dispatcher() {
    let enricher = Enricher::new(EnricherOptions::default()).unwrap();
    assert_eq!(enricher.boundary().as_str(), "tracing_core::event::Event");
}

#[test]
fn test_explicit_boundary_skips_custom_facade() {
    let enricher = Enricher::new(EnricherOptions {
        boundary: Some(BoundaryType::new(format!("{}::AuditLogger", MODULE))),
        ..options(AttributeSet::CALLER, 1, Level::TRACE)
    })
    .unwrap()
    .with_introspector(Arc::new(audit_stack()));

    let mut event = LogEvent::new(Level::INFO, "billing");
    assert_eq!(
        enricher.enrich(&mut event),
        EnrichmentOutcome::Enriched { collected: 1 }
    );
    assert_eq!(method_of(&event).as_deref(), Some("finalize"));
}

#[test]
fn test_boundary_from_logger_instance() {
    let enricher = Enricher::new(options(AttributeSet::CALLER, 1, Level::TRACE))
        .unwrap()
        .with_introspector(Arc::new(audit_stack()));

    // The dispatcher never appears on this stack.
    let mut before = LogEvent::new(Level::INFO, "billing");
    assert_eq!(
        enricher.enrich(&mut before),
        EnrichmentOutcome::Enriched { collected: 0 }
    );

    let logger = AuditLogger;
    enricher.set_boundary_from_logger(&logger).unwrap();
    assert_eq!(enricher.boundary().as_str(), format!("{}::AuditLogger", MODULE));

    let mut after = LogEvent::new(Level::INFO, "billing");
    enricher.enrich(&mut after);
    assert_eq!(method_of(&after).as_deref(), Some("finalize"));
}

#[test]
fn test_concurrent_first_use_resolves_once() {
    let sink = Arc::new(CountingSink {
        calls: AtomicUsize::new(0),
        boundary: "billing::log::Facade",
    });
    let enricher = Arc::new(
        Enricher::new(options(AttributeSet::CALLER, 1, Level::TRACE))
            .unwrap()
            .with_active_sink(sink.clone())
            .with_introspector(Arc::new(FixedStack::from_symbols([
                "billing::log::Facade::emit",
                "billing::invoice::Invoice::finalize",
            ]))),
    );

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let enricher = Arc::clone(&enricher);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut event = LogEvent::new(Level::INFO, "billing");
                enricher.enrich(&mut event);
                method_of(&event)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().as_deref(), Some("finalize"));
    }
    assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_explicit_boundary_survives_sink_swap() {
    let sink = Arc::new(CountingSink {
        calls: AtomicUsize::new(0),
        boundary: "other::Facade",
    });
    let enricher = Enricher::new(EnricherOptions {
        boundary: Some(BoundaryType::new("billing::log::Facade")),
        ..EnricherOptions::default()
    })
    .unwrap()
    .with_active_sink(sink.clone());

    assert_eq!(enricher.boundary().as_str(), "billing::log::Facade");
    assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_generic_boundary_matches_normalized_frames() {
    let enricher = Enricher::new(EnricherOptions {
        boundary: Some(BoundaryType::new("billing::log::Facade<alloc::string::String>")),
        ..options(AttributeSet::CALLER, 1, Level::TRACE)
    })
    .unwrap()
    .with_introspector(Arc::new(FixedStack::from_symbols([
        "billing::log::Facade<T>::emit",
        "billing::invoice::Invoice::finalize",
    ])));

    let mut event = LogEvent::new(Level::INFO, "billing");
    enricher.enrich(&mut event);
    assert_eq!(method_of(&event).as_deref(), Some("finalize"));
}
