//! Log event property bag.
//!
//! [`EventProperties`] is what the enricher needs from a host framework's
//! event: its level and an add-if-absent property write. [`LogEvent`] is the
//! crate's own implementation, produced by the `tracing` layer and handed to
//! consumers.

use crate::value::FieldValue;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::Level;

/// Event property names written by the enricher.
pub mod property_names {
    pub const STACK_TRACE_DEPTH: &str = "StackTraceDepth";
    pub const ASSEMBLY_NAME: &str = "AssemblyName";
    pub const ASSEMBLY_FULL_NAME: &str = "AssemblyFullName";
    pub const CLASS_NAME: &str = "ClassName";
    pub const METHOD_NAME: &str = "MethodName";
    pub const IL_OFFSET: &str = "ILOffset";
    pub const NATIVE_OFFSET: &str = "NativeOffset";
    pub const FILE_NAME: &str = "FileName";
    pub const LINE_NUMBER: &str = "LineNumber";
    pub const COLUMN_NUMBER: &str = "ColumnNumber";
    pub const STACK_TRACE: &str = "StackTrace";
}

/// Mutable view of a log event, as required by the enricher.
pub trait EventProperties {
    fn level(&self) -> Level;

    fn contains_property(&self, name: &str) -> bool;

    /// Add `value` under `name` unless a property with that name exists.
    ///
    /// Returns `true` when the property was written.
    fn add_property_if_absent(&mut self, name: String, value: FieldValue) -> bool;
}

/// A structured log record.
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(serialize_with = "serialize_level")]
    pub level: Level,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    properties: BTreeMap<String, FieldValue>,
}

fn serialize_level<S: Serializer>(level: &Level, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(level.as_str())
}

impl LogEvent {
    pub fn new(level: Level, target: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            target: target.into(),
            message: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&FieldValue> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> &BTreeMap<String, FieldValue> {
        &self.properties
    }

    pub fn into_properties(self) -> BTreeMap<String, FieldValue> {
        self.properties
    }
}

impl EventProperties for LogEvent {
    fn level(&self) -> Level {
        self.level
    }

    fn contains_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    fn add_property_if_absent(&mut self, name: String, value: FieldValue) -> bool {
        if self.properties.contains_key(&name) {
            return false;
        }
        self.properties.insert(name, value);
        true
    }
}
