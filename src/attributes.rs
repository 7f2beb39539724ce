//! Requested attribute set
//!
//! Which call-site attributes are projected onto each event. The set is a
//! struct of named capabilities; [`AttributeSet::normalized`] applies the
//! implied-attribute rules once, when an enricher is configured, so projection
//! never has to re-derive them.

use crate::error::EnrichError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single projectable attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Crate name (also writes `AssemblyFullName`, the module path).
    AssemblyName,
    ClassName,
    MethodName,
    /// Offset of the instruction pointer within its symbol.
    IlOffset,
    /// Instruction pointer relative to the module base.
    NativeOffset,
    FileName,
    LineNumber,
    ColumnNumber,
    /// Synthesized `Class.method > ...` call chain.
    StackTrace,
}

impl Attribute {
    pub const ALL: [Attribute; 9] = [
        Attribute::AssemblyName,
        Attribute::ClassName,
        Attribute::MethodName,
        Attribute::IlOffset,
        Attribute::NativeOffset,
        Attribute::FileName,
        Attribute::LineNumber,
        Attribute::ColumnNumber,
        Attribute::StackTrace,
    ];

    /// Base event property name for this attribute.
    pub fn property_name(self) -> &'static str {
        match self {
            Attribute::AssemblyName => crate::event::property_names::ASSEMBLY_NAME,
            Attribute::ClassName => crate::event::property_names::CLASS_NAME,
            Attribute::MethodName => crate::event::property_names::METHOD_NAME,
            Attribute::IlOffset => crate::event::property_names::IL_OFFSET,
            Attribute::NativeOffset => crate::event::property_names::NATIVE_OFFSET,
            Attribute::FileName => crate::event::property_names::FILE_NAME,
            Attribute::LineNumber => crate::event::property_names::LINE_NUMBER,
            Attribute::ColumnNumber => crate::event::property_names::COLUMN_NUMBER,
            Attribute::StackTrace => crate::event::property_names::STACK_TRACE,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property_name())
    }
}

/// Set of requested attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AttributeSet {
    pub assembly_name: bool,
    pub class_name: bool,
    pub method_name: bool,
    pub il_offset: bool,
    pub native_offset: bool,
    pub file_name: bool,
    pub line_number: bool,
    pub column_number: bool,
    pub stack_trace: bool,
}

impl AttributeSet {
    pub const NONE: AttributeSet = AttributeSet {
        assembly_name: false,
        class_name: false,
        method_name: false,
        il_offset: false,
        native_offset: false,
        file_name: false,
        line_number: false,
        column_number: false,
        stack_trace: false,
    };

    pub const CALLER: AttributeSet = AttributeSet {
        class_name: true,
        method_name: true,
        ..AttributeSet::NONE
    };

    pub const SOURCE: AttributeSet = AttributeSet {
        file_name: true,
        line_number: true,
        column_number: true,
        ..AttributeSet::NONE
    };

    pub const CALLER_AND_SOURCE: AttributeSet = AttributeSet::CALLER.union(AttributeSet::SOURCE);

    /// The set used when nothing is configured.
    pub const DEFAULT: AttributeSet = AttributeSet::CALLER;

    pub const fn union(self, other: AttributeSet) -> AttributeSet {
        AttributeSet {
            assembly_name: self.assembly_name || other.assembly_name,
            class_name: self.class_name || other.class_name,
            method_name: self.method_name || other.method_name,
            il_offset: self.il_offset || other.il_offset,
            native_offset: self.native_offset || other.native_offset,
            file_name: self.file_name || other.file_name,
            line_number: self.line_number || other.line_number,
            column_number: self.column_number || other.column_number,
            stack_trace: self.stack_trace || other.stack_trace,
        }
    }

    pub fn contains(&self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::AssemblyName => self.assembly_name,
            Attribute::ClassName => self.class_name,
            Attribute::MethodName => self.method_name,
            Attribute::IlOffset => self.il_offset,
            Attribute::NativeOffset => self.native_offset,
            Attribute::FileName => self.file_name,
            Attribute::LineNumber => self.line_number,
            Attribute::ColumnNumber => self.column_number,
            Attribute::StackTrace => self.stack_trace,
        }
    }

    pub fn insert(&mut self, attribute: Attribute) {
        match attribute {
            Attribute::AssemblyName => self.assembly_name = true,
            Attribute::ClassName => self.class_name = true,
            Attribute::MethodName => self.method_name = true,
            Attribute::IlOffset => self.il_offset = true,
            Attribute::NativeOffset => self.native_offset = true,
            Attribute::FileName => self.file_name = true,
            Attribute::LineNumber => self.line_number = true,
            Attribute::ColumnNumber => self.column_number = true,
            Attribute::StackTrace => self.stack_trace = true,
        }
    }

    pub fn with(mut self, attribute: Attribute) -> AttributeSet {
        self.insert(attribute);
        self
    }

    /// Apply the implied-attribute rules.
    ///
    /// A column is meaningless without its line, and a line without its file,
    /// so `ColumnNumber` implies `LineNumber` and `LineNumber` implies
    /// `FileName`.
    pub const fn normalized(self) -> AttributeSet {
        let line_number = self.line_number || self.column_number;
        let file_name = self.file_name || line_number;
        AttributeSet {
            line_number,
            file_name,
            ..self
        }
    }

    /// Whether source locations must be resolved for each frame.
    pub fn needs_file_info(&self) -> bool {
        self.file_name
    }

    pub fn is_empty(&self) -> bool {
        *self == AttributeSet::NONE
    }

    /// Requested attributes in projection order.
    pub fn iter(&self) -> impl Iterator<Item = Attribute> + '_ {
        Attribute::ALL.into_iter().filter(move |a| self.contains(*a))
    }

    /// Parse a list of attribute names and shorthands into a normalized set.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<AttributeSet, EnrichError> {
        let mut set = AttributeSet::NONE;
        for name in names {
            set = set.union(name.as_ref().parse()?);
        }
        Ok(set.normalized())
    }
}

impl FromStr for AttributeSet {
    type Err = EnrichError;

    /// Accepts names like `ClassName`, shorthands like `Caller`, combined with
    /// `|`, `,` or whitespace. Matching ignores case and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = AttributeSet::NONE;
        for token in s
            .split(|c: char| c == '|' || c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let key: String = token
                .chars()
                .filter(|c| *c != '_' && *c != '-')
                .collect::<String>()
                .to_ascii_lowercase();
            let parsed = match key.as_str() {
                "none" => AttributeSet::NONE,
                "assemblyname" => AttributeSet::NONE.with(Attribute::AssemblyName),
                "classname" => AttributeSet::NONE.with(Attribute::ClassName),
                "methodname" => AttributeSet::NONE.with(Attribute::MethodName),
                "iloffset" => AttributeSet::NONE.with(Attribute::IlOffset),
                "nativeoffset" => AttributeSet::NONE.with(Attribute::NativeOffset),
                "filename" => AttributeSet::NONE.with(Attribute::FileName),
                "linenumber" => AttributeSet::NONE.with(Attribute::LineNumber),
                "columnnumber" => AttributeSet::NONE.with(Attribute::ColumnNumber),
                "stacktrace" => AttributeSet::NONE.with(Attribute::StackTrace),
                "caller" => AttributeSet::CALLER,
                "source" => AttributeSet::SOURCE,
                "callerandsource" => AttributeSet::CALLER_AND_SOURCE,
                "default" => AttributeSet::DEFAULT,
                _ => return Err(EnrichError::InvalidAttribute(token.to_string())),
            };
            set = set.union(parsed);
        }
        Ok(set)
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let names: Vec<&str> = self.iter().map(Attribute::property_name).collect();
        f.write_str(&names.join(" | "))
    }
}
