//! Self diagnostics.
//!
//! Problems inside the enricher are reported as `tracing` events under
//! [`SELF_LOG_TARGET`]. The enrichment layer passes these events through
//! without enriching them.

use crate::error::CaptureError;
use tracing::warn;

/// Target of the enricher's own diagnostic events.
pub const SELF_LOG_TARGET: &str = "callsite_enricher::self_log";

pub(crate) fn capture_failed(err: &CaptureError) {
    warn!(
        target: SELF_LOG_TARGET,
        error = %err,
        "Failed to enrich event with stack trace"
    );
}

pub(crate) fn boundary_resolved(boundary: &str, explicit: bool) {
    tracing::debug!(
        target: SELF_LOG_TARGET,
        boundary,
        explicit,
        "Resolved caller stack boundary"
    );
}
