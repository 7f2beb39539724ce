//! Frame descriptors: immutable snapshots of one call-stack frame.

use crate::stack::introspect::RawFrame;
use crate::stack::symbol::SymbolPath;
use serde::Serialize;

/// Offset reported when the symbol start address is unknown.
pub const UNKNOWN_IL_OFFSET: i64 = -1;

/// Offset reported when the module base address is unknown.
pub const UNKNOWN_NATIVE_OFFSET: i64 = 0;

/// Source position of a frame. Line and column are 0 when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub file_name: Option<String>,
    pub line_number: u32,
    pub column_number: u32,
}

/// Identifying and positional data of one stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameDescriptor {
    assembly_name: Option<String>,
    assembly_full_name: Option<String>,
    class_name: Option<String>,
    method_name: Option<String>,
    il_offset: i64,
    native_offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<SourceLocation>,
}

impl FrameDescriptor {
    /// Snapshot `frame`, keeping its source location only when `need_file_info`.
    pub fn from_raw(frame: &RawFrame, need_file_info: bool) -> Self {
        let path = frame
            .symbol
            .as_deref()
            .map(SymbolPath::parse)
            .unwrap_or_default();

        let il_offset = match frame.symbol_address {
            Some(start) if frame.instruction_pointer >= start => {
                i64::try_from(frame.instruction_pointer - start).unwrap_or(UNKNOWN_IL_OFFSET)
            }
            _ => UNKNOWN_IL_OFFSET,
        };
        let native_offset = match frame.module_base {
            Some(base) if frame.instruction_pointer >= base => {
                i64::try_from(frame.instruction_pointer - base).unwrap_or(UNKNOWN_NATIVE_OFFSET)
            }
            _ => UNKNOWN_NATIVE_OFFSET,
        };

        let source = need_file_info.then(|| SourceLocation {
            file_name: frame.file_name.clone(),
            line_number: frame.line_number.unwrap_or(0),
            column_number: frame.column_number.unwrap_or(0),
        });

        Self {
            assembly_name: path.crate_name,
            assembly_full_name: path.module_path,
            class_name: path.declaring_type,
            method_name: path.method_name,
            il_offset,
            native_offset,
            source,
        }
    }

    /// Crate that defines the frame's function.
    pub fn assembly_name(&self) -> Option<&str> {
        self.assembly_name.as_deref()
    }

    /// Module path that contains the frame's function.
    pub fn assembly_full_name(&self) -> Option<&str> {
        self.assembly_full_name.as_deref()
    }

    /// Declaring type, or the module for free functions.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn method_name(&self) -> Option<&str> {
        self.method_name.as_deref()
    }

    pub fn il_offset(&self) -> i64 {
        self.il_offset
    }

    pub fn native_offset(&self) -> i64 {
        self.native_offset
    }

    pub fn source(&self) -> Option<&SourceLocation> {
        self.source.as_ref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.file_name.as_deref())
    }

    pub fn line_number(&self) -> Option<u32> {
        self.source.as_ref().map(|s| s.line_number)
    }

    pub fn column_number(&self) -> Option<u32> {
        self.source.as_ref().map(|s| s.column_number)
    }
}
