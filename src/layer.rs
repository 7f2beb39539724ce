//! `tracing` pipeline stage.
//!
//! [`EnrichmentLayer`] turns each `tracing` event into a [`LogEvent`], copies
//! the event's own fields, enriches it with the caller's frames and hands it
//! to an [`EventConsumer`].

use crate::consumer::EventConsumer;
use crate::enricher::Enricher;
use crate::event::{EventProperties, LogEvent};
use crate::self_log::SELF_LOG_TARGET;
use crate::value::FieldValue;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

thread_local! {
    static ENRICHING: Cell<bool> = const { Cell::new(false) };
}

/// Clears the re-entrancy flag when the enrichment of one event ends.
struct EnrichingGuard;

impl EnrichingGuard {
    fn enter() -> Option<Self> {
        ENRICHING
            .try_with(|flag| {
                if flag.get() {
                    None
                } else {
                    flag.set(true);
                    Some(EnrichingGuard)
                }
            })
            .ok()
            .flatten()
    }
}

impl Drop for EnrichingGuard {
    fn drop(&mut self) {
        let _ = ENRICHING.try_with(|flag| flag.set(false));
    }
}

/// Layer that enriches every event and forwards it to a consumer.
pub struct EnrichmentLayer<C> {
    enricher: Arc<Enricher>,
    consumer: C,
}

impl<C: EventConsumer> EnrichmentLayer<C> {
    pub fn new(enricher: Arc<Enricher>, consumer: C) -> Self {
        Self { enricher, consumer }
    }

    pub fn enricher(&self) -> &Arc<Enricher> {
        &self.enricher
    }
}

impl<S, C> Layer<S> for EnrichmentLayer<C>
where
    S: Subscriber,
    C: EventConsumer,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target() == SELF_LOG_TARGET {
            return;
        }
        // Events raised while this thread is already enriching (from a
        // consumer or the unwinder) are dropped here to avoid recursion.
        let Some(_guard) = EnrichingGuard::enter() else {
            return;
        };

        let mut log_event = LogEvent::new(*metadata.level(), metadata.target());
        event.record(&mut FieldVisitor {
            event: &mut log_event,
        });
        self.enricher.enrich(&mut log_event);
        self.consumer.consume(log_event);
    }
}

/// Copies an event's fields into a [`LogEvent`].
struct FieldVisitor<'a> {
    event: &'a mut LogEvent,
}

impl FieldVisitor<'_> {
    fn add(&mut self, field: &Field, value: FieldValue) {
        self.event
            .add_property_if_absent(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor<'_> {
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.add(field, FieldValue::known(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.add(field, FieldValue::known(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.add(field, FieldValue::known(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.add(field, FieldValue::known(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.event.message = Some(value.to_string());
        } else {
            self.add(field, FieldValue::known(value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{:?}", value);
        if field.name() == "message" {
            self.event.message = Some(rendered);
        } else {
            self.add(field, FieldValue::known(rendered));
        }
    }
}
