//! Stack introspection capability.
//!
//! [`StackIntrospector`] is the seam between the walker and the runtime's
//! unwinder. The production implementation, [`BacktraceIntrospector`], uses the
//! `backtrace` crate; [`FixedStack`] replays a prepared capture.

use crate::error::CaptureError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Default cap on captured frames per walk.
pub const DEFAULT_MAX_FRAMES: usize = 256;

/// One captured frame, innermost first in a capture.
///
/// Functions inlined into a physical frame are reported as separate frames
/// when debug info allows resolving them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFrame {
    /// Demangled symbol name.
    pub symbol: Option<String>,
    pub instruction_pointer: usize,
    pub symbol_address: Option<usize>,
    pub module_base: Option<usize>,
    pub file_name: Option<String>,
    pub line_number: Option<u32>,
    pub column_number: Option<u32>,
}

impl RawFrame {
    /// A frame with only a symbol name, as produced by scripted captures.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self {
            symbol: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Captures the current thread's call stack.
pub trait StackIntrospector: Send + Sync {
    /// Capture frames innermost first. File, line and column are only
    /// resolved when `need_file_info` is set.
    fn capture(&self, need_file_info: bool) -> Result<Vec<RawFrame>, CaptureError>;
}

/// Unwinds the live stack with the `backtrace` crate.
#[derive(Debug, Clone)]
pub struct BacktraceIntrospector {
    max_frames: usize,
}

impl BacktraceIntrospector {
    pub fn new() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }

    pub fn with_max_frames(max_frames: usize) -> Self {
        Self {
            max_frames: max_frames.max(1),
        }
    }
}

impl Default for BacktraceIntrospector {
    fn default() -> Self {
        Self::new()
    }
}

impl StackIntrospector for BacktraceIntrospector {
    fn capture(&self, need_file_info: bool) -> Result<Vec<RawFrame>, CaptureError> {
        let max_frames = self.max_frames;
        // Symbol resolution runs outside the unwinder callback, so a panic
        // while resolving becomes a denied capture. The callback only copies
        // frames; a panic there would abort.
        panic::catch_unwind(AssertUnwindSafe(|| {
            resolve_frames(&trace_frames(max_frames), need_file_info, max_frames)
        }))
        .map_err(|payload| CaptureError::AccessDenied(panic_message(payload.as_ref())))
    }
}

/// Unresolved frames of the current stack, innermost first.
fn trace_frames(max_frames: usize) -> Vec<backtrace::Frame> {
    let mut frames = Vec::with_capacity(max_frames.min(64));
    backtrace::trace(|frame| {
        frames.push(frame.clone());
        frames.len() < max_frames
    });
    frames
}

fn resolve_frames(
    traced: &[backtrace::Frame],
    need_file_info: bool,
    max_frames: usize,
) -> Vec<RawFrame> {
    let mut frames: Vec<RawFrame> = Vec::with_capacity(traced.len());
    for frame in traced {
        if frames.len() >= max_frames {
            break;
        }
        let instruction_pointer = frame.ip() as usize;
        let frame_symbol_address = non_null(frame.symbol_address() as usize);
        let module_base = frame
            .module_base_address()
            .and_then(|base| non_null(base as usize));

        // Inlined functions resolve to several symbols, innermost first.
        let before = frames.len();
        backtrace::resolve_frame(frame, |symbol| {
            if frames.len() >= max_frames {
                return;
            }
            let (file_name, line_number, column_number) = if need_file_info {
                (
                    symbol.filename().map(|p| p.display().to_string()),
                    symbol.lineno(),
                    symbol.colno(),
                )
            } else {
                (None, None, None)
            };
            frames.push(RawFrame {
                symbol: symbol.name().map(|name| format!("{:#}", name)),
                instruction_pointer,
                symbol_address: symbol
                    .addr()
                    .and_then(|addr| non_null(addr as usize))
                    .or(frame_symbol_address),
                module_base,
                file_name,
                line_number,
                column_number,
            });
        });
        if frames.len() == before {
            frames.push(RawFrame {
                instruction_pointer,
                symbol_address: frame_symbol_address,
                module_base,
                ..RawFrame::default()
            });
        }
    }
    frames.truncate(max_frames);
    frames
}

fn non_null(addr: usize) -> Option<usize> {
    (addr != 0).then_some(addr)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "stack unwinder panicked".to_string()
    }
}

/// Replays a fixed capture, or a fixed denial.
#[derive(Debug, Clone)]
pub struct FixedStack {
    result: Result<Vec<RawFrame>, CaptureError>,
}

impl FixedStack {
    /// Frames innermost first.
    pub fn new(frames: Vec<RawFrame>) -> Self {
        Self { result: Ok(frames) }
    }

    /// Frames from symbol names, innermost first.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(symbols.into_iter().map(RawFrame::symbol).collect())
    }

    /// Every capture fails with [`CaptureError::AccessDenied`].
    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            result: Err(CaptureError::AccessDenied(reason.into())),
        }
    }
}

impl StackIntrospector for FixedStack {
    fn capture(&self, need_file_info: bool) -> Result<Vec<RawFrame>, CaptureError> {
        let mut frames = self.result.clone()?;
        if !need_file_info {
            for frame in &mut frames {
                frame.file_name = None;
                frame.line_number = None;
                frame.column_number = None;
            }
        }
        Ok(frames)
    }
}
