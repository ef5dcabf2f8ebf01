use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A plain key/value-representable field value.
///
/// Every field that flows through a projection is one of these variants.
/// Dates are normalized to [`FieldValue::Timestamp`] on the way out and
/// converted back to the native date representation on the way in; backends
/// that lose the timestamp tag may hand back an [`FieldValue::Int`] holding
/// epoch milliseconds, which [`FieldValue::as_timestamp`] still accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A point in time, serialized as epoch milliseconds.
    Timestamp(#[serde(with = "chrono::serde::ts_milliseconds")] DateTime<Utc>),
    List(Vec<FieldValue>),
    /// A nested field map. The brief summary document uses this to hold one
    /// brief projection per entity id.
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Returns the boolean value, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float value, if this is a `Float` (or a lossless `Int`).
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the string value, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the timestamp value, coercing `Int` epoch milliseconds.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            FieldValue::Int(millis) => Utc.timestamp_millis_opt(*millis).single(),
            _ => None,
        }
    }

    /// Returns the list items, if this is a `List`.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the nested field map, if this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(fields) => Some(fields),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::List(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_variants() {
        assert_eq!(FieldValue::Bool(true).as_bool(), Some(true));
        assert_eq!(FieldValue::Int(42).as_int(), Some(42));
        assert_eq!(FieldValue::Float(1.5).as_float(), Some(1.5));
        assert_eq!(FieldValue::Str("x".into()).as_str(), Some("x"));
        assert_eq!(FieldValue::Str("x".into()).as_int(), None);
    }

    #[test]
    fn test_int_coerces_to_float() {
        assert_eq!(FieldValue::Int(3).as_float(), Some(3.0));
    }

    #[test]
    fn test_timestamp_coercion_from_int_millis() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap();
        assert_eq!(FieldValue::Timestamp(ts).as_timestamp(), Some(ts));
        assert_eq!(FieldValue::Int(1_700_000_000_000).as_timestamp(), Some(ts));
        assert_eq!(FieldValue::Str("nope".into()).as_timestamp(), None);
    }

    #[test]
    fn test_timestamp_serializes_as_epoch_millis() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap();
        let json = serde_json::to_value(FieldValue::Timestamp(ts)).unwrap();
        assert_eq!(json, serde_json::json!({ "Timestamp": 1_700_000_000_000i64 }));
    }
}
