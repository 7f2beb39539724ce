//! Caller stack boundary
//!
//! The boundary type names the frames that separate the enrichment machinery
//! from the code that emitted the event. It is either configured explicitly or
//! inferred from the active log sink on first use, then published once per
//! resolver generation.

use crate::error::EnrichError;
use crate::self_log;
use crate::stack::symbol::normalize_type_path;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Normalized path of the type whose frames are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundaryType(String);

impl BoundaryType {
    /// Build from a type path; generic arguments and reference sigils are dropped.
    pub fn new(path: impl AsRef<str>) -> Self {
        BoundaryType(normalize_type_path(path.as_ref()))
    }

    /// Parse a configured path, rejecting empty ones.
    pub fn parse(path: &str) -> Result<Self, EnrichError> {
        let boundary = Self::new(path);
        if boundary.0.is_empty() {
            return Err(EnrichError::InvalidBoundary(path.to_string()));
        }
        Ok(boundary)
    }

    /// The boundary for frames declared by `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// The boundary for frames declared by the type of `logger`.
    ///
    /// References and owning pointers (`Box`, `Arc`, `Rc`) are looked through.
    /// Trait objects are rejected: their frames are declared on the concrete
    /// type, which is only known to the value itself (see
    /// [`ActiveSink::boundary_type`]).
    pub fn of_val<T>(logger: &T) -> Result<Self, EnrichError> {
        let type_name = std::any::type_name_of_val(logger);
        let pointee = pointee_type(type_name);
        if pointee.starts_with("dyn ") {
            return Err(EnrichError::InvalidBoundary(format!(
                "{} is a trait object; use the concrete logger type",
                type_name
            )));
        }
        Self::parse(pointee)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a frame's declaring type is this boundary.
    pub fn matches(&self, declaring_type: &str) -> bool {
        self.0 == declaring_type
    }
}

impl fmt::Display for BoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const POINTER_TYPES: [&str; 3] = ["alloc::boxed::Box", "alloc::sync::Arc", "alloc::rc::Rc"];

/// The type behind references and owning pointers.
fn pointee_type(type_name: &str) -> &str {
    let mut ty = type_name.trim();
    loop {
        if let Some(rest) = ty.strip_prefix("&mut ").or_else(|| ty.strip_prefix('&')) {
            ty = rest.trim_start();
            continue;
        }
        let inner = POINTER_TYPES.iter().find_map(|pointer| {
            ty.strip_prefix(pointer)
                .and_then(|rest| rest.strip_prefix('<'))
                .and_then(|rest| rest.strip_suffix('>'))
        });
        match inner {
            Some(args) => ty = first_type_argument(args),
            None => return ty,
        }
    }
}

fn first_type_argument(args: &str) -> &str {
    let bytes = args.as_bytes();
    let mut depth: i32 = 0;
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b'<' | b'(' | b'[' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' | b')' | b']' => depth -= 1,
            b',' if depth == 0 => return args[..i].trim(),
            _ => {}
        }
    }
    args.trim()
}

/// The log sink events pass through before reaching the enricher.
pub trait ActiveSink: Send + Sync {
    /// Type whose frames sit between the caller and the enricher.
    fn boundary_type(&self) -> BoundaryType;
}

/// The active `tracing` dispatcher.
///
/// Every `tracing` event macro enters the dispatcher through
/// `tracing_core::Event::dispatch`, so that type bounds the caller's frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchFacade;

impl ActiveSink for DispatchFacade {
    fn boundary_type(&self) -> BoundaryType {
        BoundaryType::of::<tracing::Event<'static>>()
    }
}

/// Lazily resolves and caches the boundary type.
pub struct BoundaryResolver {
    cell: RwLock<Arc<OnceLock<BoundaryType>>>,
    sink: Arc<dyn ActiveSink>,
}

impl BoundaryResolver {
    /// Resolver that infers the boundary from `sink` on first use.
    pub fn inferred(sink: Arc<dyn ActiveSink>) -> Self {
        Self {
            cell: RwLock::new(Arc::new(OnceLock::new())),
            sink,
        }
    }

    /// Resolver with an explicit boundary; `sink` is kept for later resets.
    pub fn explicit(boundary: BoundaryType, sink: Arc<dyn ActiveSink>) -> Self {
        Self {
            cell: RwLock::new(Arc::new(OnceLock::from(boundary))),
            sink,
        }
    }

    /// The boundary type, computing it on the first call.
    ///
    /// Concurrent first callers wait on the same cell and observe one value.
    pub fn resolve(&self) -> BoundaryType {
        let cell = Arc::clone(&self.cell.read());
        let mut inferred = false;
        let boundary = cell
            .get_or_init(|| {
                inferred = true;
                self.sink.boundary_type()
            })
            .clone();
        // Reported once the cell is published: a subscriber handling this
        // event may resolve the boundary again.
        if inferred {
            self_log::boundary_resolved(boundary.as_str(), false);
        }
        boundary
    }

    /// Replace the boundary with an explicit one.
    pub fn set(&self, boundary: BoundaryType) {
        self_log::boundary_resolved(boundary.as_str(), true);
        *self.cell.write() = Arc::new(OnceLock::from(boundary));
    }

    /// Drop any resolved boundary so the next call infers it again.
    pub fn reset(&self) {
        *self.cell.write() = Arc::new(OnceLock::new());
    }

    /// Whether a boundary has been published.
    pub fn is_resolved(&self) -> bool {
        self.cell.read().get().is_some()
    }
}

impl fmt::Debug for BoundaryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryResolver")
            .field("boundary", &self.cell.read().get())
            .finish()
    }
}
