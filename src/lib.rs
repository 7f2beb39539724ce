//! Callsite Enricher: call-site stack-trace enrichment for structured logs
//!
//! For every log event, walks the current call stack past the logging
//! facade's boundary frames, takes the first caller frames and attaches their
//! crate, type, function, offsets and source position to the event as
//! structured fields.

pub mod attributes;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod consumer;
pub mod enricher;
pub mod error;
pub mod event;
pub mod layer;
pub mod logging;
pub mod projector;
pub mod self_log;
pub mod stack;
pub mod value;

pub use attributes::{Attribute, AttributeSet};
pub use boundary::{ActiveSink, BoundaryResolver, BoundaryType, DispatchFacade};
pub use consumer::{ChannelConsumer, EventConsumer, MemoryConsumer};
pub use enricher::{Enricher, EnricherOptions, EnrichmentOutcome};
pub use error::EnrichError;
pub use event::{EventProperties, LogEvent};
pub use layer::EnrichmentLayer;
pub use value::{FieldValue, ScalarValue, UNKNOWN_PROPERTY_VALUE};
