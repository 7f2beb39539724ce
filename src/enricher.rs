//! Enrichment policy and the per-event entry point.
//!
//! Each event passes the level gate or is skipped. Skipped events only receive
//! the unknown `StackTraceDepth` sentinel (and `StackTrace`, when requested)
//! and never pay for a stack walk. Enriched events resolve the boundary, walk
//! the stack once and project every requested attribute.

use crate::attributes::AttributeSet;
use crate::boundary::{ActiveSink, BoundaryResolver, BoundaryType, DispatchFacade};
use crate::error::EnrichError;
use crate::event::EventProperties;
use crate::projector::PropertyProjector;
use crate::stack::introspect::DEFAULT_MAX_FRAMES;
use crate::stack::{BacktraceIntrospector, StackIntrospector, StackWalker};
use std::sync::Arc;
use tracing::Level;

/// Deepest stack trace that can be requested; the introspector captures no more frames.
pub const MAX_STACK_TRACE_DEPTH: usize = DEFAULT_MAX_FRAMES;

/// Construction options for an [`Enricher`].
#[derive(Debug, Clone)]
pub struct EnricherOptions {
    /// Requested attributes; normalized on construction.
    pub attributes: AttributeSet,
    /// Least severe level that is enriched.
    pub minimum_level: Level,
    /// Number of frames to project, starting at the caller.
    pub stack_trace_depth: usize,
    /// Explicit boundary; inferred from the active sink when `None`.
    pub boundary: Option<BoundaryType>,
}

impl Default for EnricherOptions {
    fn default() -> Self {
        Self {
            attributes: AttributeSet::DEFAULT,
            minimum_level: Level::TRACE,
            stack_trace_depth: 1,
            boundary: None,
        }
    }
}

/// What happened to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// Below the minimum level; sentinel fields only.
    Skipped,
    /// Stack walked; `collected` frames projected (0 when the walk failed).
    Enriched { collected: usize },
}

/// Whether an event at `level` is enriched under `minimum`.
///
/// `tracing` orders more verbose levels as greater, so an event passes when
/// it is at least as severe as the minimum.
pub fn passes_gate(level: Level, minimum: Level) -> bool {
    level <= minimum
}

/// Call-site stack-trace enricher.
pub struct Enricher {
    attributes: AttributeSet,
    minimum_level: Level,
    stack_trace_depth: usize,
    configured_boundary: Option<BoundaryType>,
    resolver: BoundaryResolver,
    walker: StackWalker,
    projector: PropertyProjector,
}

impl Enricher {
    pub fn new(options: EnricherOptions) -> Result<Self, EnrichError> {
        if !(1..=MAX_STACK_TRACE_DEPTH).contains(&options.stack_trace_depth) {
            let depth = i64::try_from(options.stack_trace_depth).unwrap_or(i64::MAX);
            return Err(EnrichError::InvalidDepth(depth));
        }

        let attributes = options.attributes.normalized();
        let sink: Arc<dyn ActiveSink> = Arc::new(DispatchFacade);
        let resolver = match options.boundary.clone() {
            Some(boundary) => BoundaryResolver::explicit(boundary, sink),
            None => BoundaryResolver::inferred(sink),
        };

        Ok(Self {
            attributes,
            minimum_level: options.minimum_level,
            stack_trace_depth: options.stack_trace_depth,
            configured_boundary: options.boundary,
            resolver,
            walker: StackWalker::new(Arc::new(BacktraceIntrospector::new())),
            projector: PropertyProjector::new(attributes, options.stack_trace_depth),
        })
    }

    /// Replace the stack introspection capability.
    pub fn with_introspector(mut self, introspector: Arc<dyn StackIntrospector>) -> Self {
        self.walker = StackWalker::new(introspector);
        self
    }

    /// Infer the boundary from `sink` instead of the `tracing` dispatcher.
    ///
    /// An explicit boundary given at construction stays in effect.
    pub fn with_active_sink(mut self, sink: Arc<dyn ActiveSink>) -> Self {
        self.resolver = match self.configured_boundary.clone() {
            Some(boundary) => BoundaryResolver::explicit(boundary, sink),
            None => BoundaryResolver::inferred(sink),
        };
        self
    }

    /// Normalized attribute set.
    pub fn attributes(&self) -> AttributeSet {
        self.attributes
    }

    pub fn minimum_level(&self) -> Level {
        self.minimum_level
    }

    pub fn stack_trace_depth(&self) -> usize {
        self.stack_trace_depth
    }

    /// The boundary type, resolving it if needed.
    pub fn boundary(&self) -> BoundaryType {
        self.resolver.resolve()
    }

    /// Use `boundary` from now on.
    pub fn set_boundary(&self, boundary: BoundaryType) {
        self.resolver.set(boundary);
    }

    /// Use the type of `logger` as the boundary.
    ///
    /// Fails for trait objects, leaving the boundary unchanged; use
    /// [`set_boundary_from_sink`](Self::set_boundary_from_sink) for those.
    pub fn set_boundary_from_logger<L>(&self, logger: &L) -> Result<(), EnrichError> {
        self.resolver.set(BoundaryType::of_val(logger)?);
        Ok(())
    }

    /// Use the boundary `sink` reports for its concrete type.
    pub fn set_boundary_from_sink(&self, sink: &dyn ActiveSink) {
        self.resolver.set(sink.boundary_type());
    }

    /// Enrich one event. Never fails; problems degrade to sentinel fields.
    pub fn enrich<E: EventProperties + ?Sized>(&self, event: &mut E) -> EnrichmentOutcome {
        if !passes_gate(event.level(), self.minimum_level) {
            self.projector.apply_skipped(event);
            return EnrichmentOutcome::Skipped;
        }

        let boundary = self.resolver.resolve();
        let frames = self.walker.collect(
            &boundary,
            self.stack_trace_depth,
            self.attributes.needs_file_info(),
        );
        self.projector.apply(event, &frames);
        EnrichmentOutcome::Enriched {
            collected: frames.len(),
        }
    }
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher")
            .field("attributes", &self.attributes)
            .field("minimum_level", &self.minimum_level)
            .field("stack_trace_depth", &self.stack_trace_depth)
            .field("resolver", &self.resolver)
            .finish()
    }
}
