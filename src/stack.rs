//! Call-stack capture: introspection, symbol parsing, frame descriptors and
//! the boundary-aware walker.

pub mod frame;
pub mod introspect;
pub mod symbol;
pub mod walker;

pub use frame::{FrameDescriptor, SourceLocation};
pub use introspect::{BacktraceIntrospector, FixedStack, RawFrame, StackIntrospector};
pub use walker::StackWalker;
