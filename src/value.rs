//! Typed property values attached to log events.
//!
//! Every enriched field is either [`FieldValue::Known`] or
//! [`FieldValue::Unknown`]. The sentinel text used for unknown values is a
//! serialization concern: it only appears in [`Serialize`] output and
//! [`Display`](std::fmt::Display).

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Text rendered for [`FieldValue::Unknown`].
pub const UNKNOWN_PROPERTY_VALUE: &str = "?";

/// A scalar property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(v) => write!(f, "{}", v),
            ScalarValue::I64(v) => write!(f, "{}", v),
            ScalarValue::U64(v) => write!(f, "{}", v),
            ScalarValue::F64(v) => write!(f, "{}", v),
            ScalarValue::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        ScalarValue::Bool(v)
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::I64(v)
    }
}

impl From<u32> for ScalarValue {
    fn from(v: u32) -> Self {
        ScalarValue::I64(i64::from(v))
    }
}

impl From<u64> for ScalarValue {
    fn from(v: u64) -> Self {
        ScalarValue::U64(v)
    }
}

impl From<usize> for ScalarValue {
    fn from(v: usize) -> Self {
        ScalarValue::U64(v as u64)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::F64(v)
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        ScalarValue::Str(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::Str(v.to_string())
    }
}

/// A property value that may be unavailable.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Known(ScalarValue),
    Unknown,
}

impl FieldValue {
    pub fn known(value: impl Into<ScalarValue>) -> Self {
        FieldValue::Known(value.into())
    }

    /// `Known` when `value` is present, `Unknown` otherwise.
    pub fn from_option<T: Into<ScalarValue>>(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldValue::Known(v.into()),
            None => FieldValue::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, FieldValue::Unknown)
    }

    pub fn as_known(&self) -> Option<&ScalarValue> {
        match self {
            FieldValue::Known(v) => Some(v),
            FieldValue::Unknown => None,
        }
    }

    /// String payload, if this is a known string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Known(ScalarValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if this is a known signed or unsigned integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Known(ScalarValue::I64(v)) => Some(*v),
            FieldValue::Known(ScalarValue::U64(v)) => i64::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Known(v) => v.fmt(f),
            FieldValue::Unknown => f.write_str(UNKNOWN_PROPERTY_VALUE),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Known(v) => v.serialize(serializer),
            FieldValue::Unknown => serializer.serialize_str(UNKNOWN_PROPERTY_VALUE),
        }
    }
}

impl From<ScalarValue> for FieldValue {
    fn from(v: ScalarValue) -> Self {
        FieldValue::Known(v)
    }
}
