//! Stack walking and projection properties

use callsite_enricher::attributes::AttributeSet;
use callsite_enricher::enricher::{Enricher, EnricherOptions, EnrichmentOutcome};
use callsite_enricher::event::LogEvent;
use callsite_enricher::projector::property_for_depth;
use callsite_enricher::stack::FixedStack;
use callsite_enricher::value::FieldValue;
use proptest::prelude::*;
use std::sync::Arc;
use tracing::Level;

const DISPATCH: &str = "tracing_core::event::Event::dispatch";

fn stack(machinery: usize, boundary: usize, callers: usize) -> FixedStack {
    let mut symbols = Vec::new();
    for i in 0..machinery {
        symbols.push(format!("callsite_enricher::internal::Step{}::run", i));
    }
    for _ in 0..boundary {
        symbols.push(DISPATCH.to_string());
    }
    for i in 0..callers {
        symbols.push(format!("app::layer{}::Service::call{}", i, i));
    }
    FixedStack::from_symbols(symbols)
}

fn enricher(depth: usize, stack: FixedStack) -> Enricher {
    Enricher::new(EnricherOptions {
        attributes: AttributeSet::CALLER,
        minimum_level: Level::TRACE,
        stack_trace_depth: depth,
        boundary: None,
    })
    .unwrap()
    .with_introspector(Arc::new(stack))
}

proptest! {
    #[test]
    fn test_collected_is_min_of_depth_and_available(
        machinery in 0usize..4,
        boundary in 1usize..4,
        callers in 0usize..12,
        depth in 1usize..10,
    ) {
        let enricher = enricher(depth, stack(machinery, boundary, callers));
        let mut event = LogEvent::new(Level::INFO, "app");
        let outcome = enricher.enrich(&mut event);

        let expected = depth.min(callers);
        prop_assert_eq!(outcome, EnrichmentOutcome::Enriched { collected: expected });

        let reported = event.property("StackTraceDepth").unwrap();
        if expected == 0 {
            prop_assert!(reported.is_unknown());
        } else {
            prop_assert_eq!(reported.as_i64(), Some(expected as i64));
        }

        for slot in 0..depth {
            let method = event.property(&property_for_depth("MethodName", slot)).unwrap();
            if slot < expected {
                let name = format!("call{}", slot);
                prop_assert_eq!(method.as_str(), Some(name.as_str()));
            } else {
                prop_assert_eq!(method, &FieldValue::Unknown);
            }
        }
        prop_assert!(event.property(&property_for_depth("MethodName", depth)).is_none());
    }

    #[test]
    fn test_enriching_twice_changes_nothing(callers in 0usize..6, depth in 1usize..6) {
        let enricher = enricher(depth, stack(2, 1, callers));
        let mut event = LogEvent::new(Level::WARN, "app");
        enricher.enrich(&mut event);
        let first = event.properties().clone();

        enricher.enrich(&mut event);
        prop_assert_eq!(event.properties(), &first);
    }

    #[test]
    fn test_no_boundary_collects_nothing(callers in 0usize..12, depth in 1usize..10) {
        let enricher = enricher(depth, stack(0, 0, callers));
        let mut event = LogEvent::new(Level::ERROR, "app");
        prop_assert_eq!(
            enricher.enrich(&mut event),
            EnrichmentOutcome::Enriched { collected: 0 }
        );
    }

    #[test]
    fn test_symbol_parsing_never_panics(symbol in "\\PC{0,64}") {
        let _ = callsite_enricher::stack::symbol::SymbolPath::parse(&symbol);
        let _ = callsite_enricher::stack::symbol::normalize_type_path(&symbol);
    }
}
