//! Stack walker: finds the true caller behind the boundary frames.

use crate::boundary::BoundaryType;
use crate::self_log;
use crate::stack::frame::FrameDescriptor;
use crate::stack::introspect::{RawFrame, StackIntrospector};
use crate::stack::symbol::SymbolPath;
use std::sync::Arc;

/// Walks the live call stack through a [`StackIntrospector`].
#[derive(Clone)]
pub struct StackWalker {
    introspector: Arc<dyn StackIntrospector>,
}

impl StackWalker {
    pub fn new(introspector: Arc<dyn StackIntrospector>) -> Self {
        Self { introspector }
    }

    /// Collect up to `depth` frames starting at the first caller outside the
    /// boundary.
    ///
    /// The capture is scanned innermost first: frames up to the first method
    /// of `boundary` belong to the enrichment machinery and the dispatcher,
    /// the contiguous run of boundary frames after it is the logging facade,
    /// and the next frame is the caller. Boundary frames deeper in the stack are
    /// ordinary frames. Returns fewer frames (possibly none) when the stack is
    /// shorter or the boundary never appears; a failed capture yields none.
    pub fn collect(
        &self,
        boundary: &BoundaryType,
        depth: usize,
        need_file_info: bool,
    ) -> Vec<FrameDescriptor> {
        let frames = match self.introspector.capture(need_file_info) {
            Ok(frames) => frames,
            Err(err) => {
                self_log::capture_failed(&err);
                return Vec::new();
            }
        };

        let start = caller_index(&frames, boundary);
        caller_frames(&frames[start..])
            .take(depth)
            .map(|frame| FrameDescriptor::from_raw(frame, need_file_info))
            .collect()
    }
}

/// The caller frames with closure frames folded into their enclosing function.
///
/// A closure frame directly followed by the function that defines it is one
/// logical frame; the closure frame is kept because it holds the call site.
/// `tracing`'s event macros dispatch from such a closure.
fn caller_frames(frames: &[RawFrame]) -> impl Iterator<Item = &RawFrame> + '_ {
    let paths: Vec<SymbolPath> = frames
        .iter()
        .map(|frame| frame.symbol.as_deref().map(SymbolPath::parse).unwrap_or_default())
        .collect();

    frames.iter().enumerate().filter_map(move |(index, frame)| {
        let folded = index > 0 && defines_closure(&paths[index], &paths[index - 1]);
        (!folded).then_some(frame)
    })
}

/// Whether `enclosing` is the function whose closure ran in `closure`.
fn defines_closure(enclosing: &SymbolPath, closure: &SymbolPath) -> bool {
    closure.in_closure
        && closure.method_name.is_some()
        && closure.method_name == enclosing.method_name
        && closure.declaring_type == enclosing.declaring_type
}

/// Index of the first caller frame, or `frames.len()` when there is none.
pub(crate) fn caller_index(frames: &[RawFrame], boundary: &BoundaryType) -> usize {
    // Closures defined in boundary methods run under whoever invokes them
    // (`Event::dispatch` hands one to `dispatcher::get_default`), so only the
    // boundary's own methods count.
    let is_boundary = |frame: &RawFrame| {
        frame
            .symbol
            .as_deref()
            .map(SymbolPath::parse)
            .filter(|path| !path.in_closure)
            .and_then(|path| path.declaring_type)
            .is_some_and(|ty| boundary.matches(&ty))
    };

    let mut index = 0;
    while index < frames.len() && !is_boundary(&frames[index]) {
        index += 1;
    }
    while index < frames.len() && is_boundary(&frames[index]) {
        index += 1;
    }
    index
}
