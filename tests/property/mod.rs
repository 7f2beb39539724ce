//! Property-based tests for enrichment guarantees

mod attribute_normalization;
mod walker_depth;
