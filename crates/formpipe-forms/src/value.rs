//! Typed values produced by converters.
//!
//! Converters may turn each field into a different concrete type, so the
//! converted map holds [`Value`]s: a tagged union with checked accessors
//! standing in for run-time type assertions.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The converted values of a form, keyed by field name.
pub type Values = HashMap<String, Value>;

/// A converted field value.
///
/// # Examples
///
/// ```
/// use formpipe_forms::value::Value;
///
/// let v = Value::from(42_i64);
/// assert_eq!(v.as_int(), Some(42));
/// assert_eq!(v.as_str(), None);
///
/// let v = Value::from("hello");
/// assert_eq!(v, Value::String("hello".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// An unconverted (or string-producing) field value.
    String(String),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 32-bit floating-point number.
    Float32(f32),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// An instant in UTC.
    DateTime(DateTime<Utc>),
    /// A UUID value.
    Uuid(uuid::Uuid),
    /// Arbitrary structured data from a custom converter.
    Json(serde_json::Value),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Json(j) => write!(f, "{j}"),
        }
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl Value {
    /// Returns the variant name, for error messages and logs.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Float32(_) => "float32",
            Self::Float(_) => "float64",
            Self::Bool(_) => "bool",
            Self::DateTime(_) => "datetime",
            Self::Uuid(_) => "uuid",
            Self::Json(_) => "json",
        }
    }

    /// Attempts to extract a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to extract a 32-bit float value.
    pub const fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float32(f) => Some(*f),
            _ => None,
        }
    }

    /// Attempts to extract a 64-bit float value.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Attempts to extract a boolean value.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract a UTC instant.
    pub const fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Attempts to extract a UUID.
    pub const fn as_uuid(&self) -> Option<uuid::Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Consumes the value, returning the owned string if it is one.
    pub fn into_string(self) -> Option<String> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_from_scalars() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42_i32), Value::Int(42));
        assert_eq!(Value::from(42_i64), Value::Int(42));
        assert_eq!(Value::from(1.5_f32), Value::Float32(1.5));
        assert_eq!(Value::from(1.5_f64), Value::Float(1.5));
        assert_eq!(Value::from("x"), Value::String("x".into()));
    }

    #[test]
    fn test_accessors_reject_other_variants() {
        let v = Value::Int(7);
        assert_eq!(v.as_int(), Some(7));
        assert_eq!(v.as_f64(), None);
        assert_eq!(v.as_f32(), None);
        assert_eq!(v.as_bool(), None);
        assert_eq!(v.as_str(), None);
        assert_eq!(v.as_datetime(), None);
        assert_eq!(v.as_uuid(), None);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::from("a").type_name(), "string");
        assert_eq!(Value::Float32(1.0).type_name(), "float32");
        assert_eq!(Value::Float(1.0).type_name(), "float64");
    }

    #[test]
    fn test_display() {
        let dt = Utc.with_ymd_and_hms(1978, 7, 10, 0, 0, 0).unwrap();
        assert_eq!(Value::DateTime(dt).to_string(), "1978-07-10T00:00:00+00:00");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::from("bar").to_string(), "bar");
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(Value::Int(5)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Int", "value": 5}));
    }

    #[test]
    fn test_into_string() {
        assert_eq!(Value::from("s").into_string(), Some("s".to_string()));
        assert_eq!(Value::Bool(true).into_string(), None);
    }
}
