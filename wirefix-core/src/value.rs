/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Loose message object model.
//!
//! A message instance is a tree whose shape mirrors a field-set definition:
//! keys matching simple-field names map to scalar values, keys matching
//! component names map to nested objects, and keys matching a group's name
//! (or its counting-field name) map to an ordered sequence of instance
//! objects. Keys the schema does not know are ignored by the encoder; the
//! schema is authoritative, the object is permissive.

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Key/value storage for object nodes.
pub type FieldMap = HashMap<String, Value>;

/// A dynamically typed value inside a message instance tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Explicit absence; encodes to nothing, like a missing key.
    Null,
    /// Text value.
    String(String),
    /// Signed integer value.
    Int(i64),
    /// Decimal value with full source precision preserved.
    Float(Decimal),
    /// Boolean value (wire form `Y` / `N`).
    Bool(bool),
    /// Raw byte value for length-prefixed data fields.
    Bytes(Bytes),
    /// UTC calendar instant.
    Timestamp(DateTime<Utc>),
    /// Time of day without a date component.
    Time(NaiveTime),
    /// Calendar date without a time component.
    Date(NaiveDate),
    /// Nested object keyed by field/component/group names.
    Object(FieldMap),
    /// Ordered sequence of group instance objects.
    Array(Vec<Value>),
}

impl Value {
    /// Builds an object value from `(name, value)` pairs.
    #[must_use]
    pub fn record<'a>(pairs: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        Self::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// Builds an array value from instance objects.
    #[must_use]
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Array(items.into_iter().collect())
    }

    /// Returns true for [`Value::Null`].
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Looks up a key if this value is an object.
    ///
    /// # Arguments
    /// * `key` - The field, component, or group name
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the object map, if this is an Object variant.
    #[must_use]
    pub const fn as_object(&self) -> Option<&FieldMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the instance sequence, if this is an Array variant.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the value as a string slice, if it is a String variant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an Int variant.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a Decimal, if it is a Float variant.
    #[must_use]
    pub const fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a bool, if it is a Bool variant.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the raw bytes, if this is a Bytes variant.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::String(s) => write!(f, "{}", s),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", if *v { "Y" } else { "N" }),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Timestamp(dt) => write!(f, "{}", dt.format("%Y%m%d-%H:%M:%S%.3f")),
            Self::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.3f")),
            Self::Date(d) => write!(f, "{}", d.format("%Y%m%d")),
            Self::Object(map) => write!(f, "<object: {} keys>", map.len()),
            Self::Array(items) => write!(f, "<array: {} instances>", items.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Float(v)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Self::Bytes(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Timestamp(dt)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_record_lookup() {
        let v = Value::record([("ClOrdID", "Order-a".into()), ("Price", 100.into())]);
        assert_eq!(v.get("ClOrdID").and_then(Value::as_str), Some("Order-a"));
        assert_eq!(v.get("Price").and_then(Value::as_i64), Some(100));
        assert!(v.get("Unknown").is_none());
    }

    #[test]
    fn test_scalar_accessors() {
        assert_eq!(Value::Int(-5).as_i64(), Some(-5));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(
            Value::Float(Decimal::from_str("1.25").unwrap()).as_decimal(),
            Some(Decimal::from_str("1.25").unwrap())
        );
        assert!(Value::Null.is_null());
        assert!(Value::Int(0).as_str().is_none());
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Value::Bool(true).to_string(), "Y");
        assert_eq!(Value::Bool(false).to_string(), "N");
        assert_eq!(Value::Int(42).to_string(), "42");
        let d = NaiveDate::from_ymd_opt(2018, 7, 25).unwrap();
        assert_eq!(Value::Date(d).to_string(), "20180725");
    }

    #[test]
    fn test_structural_equality() {
        let a = Value::record([("Symbol", "EUR/USD".into())]);
        let b = Value::record([("Symbol", "EUR/USD".into())]);
        assert_eq!(a, b);
    }
}
