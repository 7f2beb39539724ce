//! Property projection: frame descriptors to event fields.

use crate::attributes::{Attribute, AttributeSet};
use crate::event::{property_names, EventProperties};
use crate::stack::FrameDescriptor;
use crate::value::{FieldValue, UNKNOWN_PROPERTY_VALUE};

/// Property name for `base` at stack `depth`: `base` for the caller itself,
/// `base_N` for the N-th frame below it.
pub fn property_for_depth(base: &str, depth: usize) -> String {
    if depth == 0 {
        base.to_string()
    } else {
        format!("{}_{}", base, depth)
    }
}

/// Writes requested attributes onto events, never overwriting existing fields.
#[derive(Debug, Clone, Copy)]
pub struct PropertyProjector {
    attributes: AttributeSet,
    depth: usize,
}

impl PropertyProjector {
    /// `attributes` are expected to be normalized already.
    pub fn new(attributes: AttributeSet, depth: usize) -> Self {
        Self { attributes, depth }
    }

    pub fn attributes(&self) -> AttributeSet {
        self.attributes
    }

    /// Project collected frames onto `event`.
    ///
    /// Slots `0..depth` are written; slots past the collected frames get
    /// [`FieldValue::Unknown`]. `StackTraceDepth` is the number of collected
    /// frames, or unknown when nothing was collected.
    pub fn apply<E: EventProperties + ?Sized>(&self, event: &mut E, frames: &[FrameDescriptor]) {
        for slot in 0..self.depth.max(frames.len()) {
            self.apply_frame(event, frames.get(slot), slot);
        }

        if self.attributes.stack_trace {
            let value = if frames.is_empty() {
                FieldValue::Unknown
            } else {
                FieldValue::known(render_stack_trace(frames))
            };
            event.add_property_if_absent(property_names::STACK_TRACE.to_string(), value);
        }

        let depth = if frames.is_empty() {
            FieldValue::Unknown
        } else {
            FieldValue::known(frames.len())
        };
        event.add_property_if_absent(property_names::STACK_TRACE_DEPTH.to_string(), depth);
    }

    /// Sentinel-only projection for events that were not enriched.
    pub fn apply_skipped<E: EventProperties + ?Sized>(&self, event: &mut E) {
        if self.attributes.stack_trace {
            event.add_property_if_absent(
                property_names::STACK_TRACE.to_string(),
                FieldValue::Unknown,
            );
        }
        event.add_property_if_absent(
            property_names::STACK_TRACE_DEPTH.to_string(),
            FieldValue::Unknown,
        );
    }

    fn apply_frame<E: EventProperties + ?Sized>(
        &self,
        event: &mut E,
        frame: Option<&FrameDescriptor>,
        slot: usize,
    ) {
        for attribute in self.attributes.iter() {
            match attribute {
                Attribute::StackTrace => {}
                Attribute::AssemblyName => {
                    write(
                        event,
                        property_names::ASSEMBLY_NAME,
                        slot,
                        FieldValue::from_option(frame.and_then(|f| f.assembly_name())),
                    );
                    write(
                        event,
                        property_names::ASSEMBLY_FULL_NAME,
                        slot,
                        FieldValue::from_option(frame.and_then(|f| f.assembly_full_name())),
                    );
                }
                Attribute::ClassName => write(
                    event,
                    property_names::CLASS_NAME,
                    slot,
                    FieldValue::from_option(frame.and_then(|f| f.class_name())),
                ),
                Attribute::MethodName => write(
                    event,
                    property_names::METHOD_NAME,
                    slot,
                    FieldValue::from_option(frame.and_then(|f| f.method_name())),
                ),
                Attribute::IlOffset => write(
                    event,
                    property_names::IL_OFFSET,
                    slot,
                    FieldValue::from_option(frame.map(|f| f.il_offset())),
                ),
                Attribute::NativeOffset => write(
                    event,
                    property_names::NATIVE_OFFSET,
                    slot,
                    FieldValue::from_option(frame.map(|f| f.native_offset())),
                ),
                Attribute::FileName => write(
                    event,
                    property_names::FILE_NAME,
                    slot,
                    FieldValue::from_option(frame.and_then(|f| f.file_name())),
                ),
                Attribute::LineNumber => write(
                    event,
                    property_names::LINE_NUMBER,
                    slot,
                    FieldValue::from_option(frame.and_then(|f| f.line_number())),
                ),
                Attribute::ColumnNumber => write(
                    event,
                    property_names::COLUMN_NUMBER,
                    slot,
                    FieldValue::from_option(frame.and_then(|f| f.column_number())),
                ),
            }
        }
    }
}

fn write<E: EventProperties + ?Sized>(event: &mut E, base: &str, slot: usize, value: FieldValue) {
    event.add_property_if_absent(property_for_depth(base, slot), value);
}

/// `Class.method` per frame, outermost collected frame first.
pub fn render_stack_trace(frames: &[FrameDescriptor]) -> String {
    frames
        .iter()
        .rev()
        .map(|f| {
            format!(
                "{}.{}",
                f.class_name().unwrap_or(UNKNOWN_PROPERTY_VALUE),
                f.method_name().unwrap_or(UNKNOWN_PROPERTY_VALUE)
            )
        })
        .collect::<Vec<_>>()
        .join(" > ")
}
