//! Record value definitions.
//!
//! This module defines the `Value` enum which represents any record the
//! engine can hold: scalars, arrays, and field->value objects. Records carry
//! no identity beyond their structure; deletes and searches always go through
//! an `Equivalence` strategy rather than pointer comparison.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// A record value held by a multiset.
///
/// Objects use a `BTreeMap` so that field order is canonical and two objects
/// built in different field order compare equal.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Null value (also the result of projecting an absent field)
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Ordered array of values
    Array(Vec<Value>),
    /// Field->value mapping
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Builds an object record from field/value pairs.
    pub fn object<K, I>(fields: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns true if this value is Null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean value if this is a Bool, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the i64 value if this is an Int, None otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the f64 value if this is a Float, None otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a Str, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Coerces this value to a number.
    ///
    /// Ints widen to f64, floats pass through; everything else is
    /// non-numeric and returns None. Numeric reductions treat None as a
    /// poisoning not-a-number member.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Looks up a field on an object record.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.get(field),
            _ => None,
        }
    }

    /// Builds a new object holding only the named fields of this record.
    ///
    /// Fields absent on the record are omitted from the projection. On
    /// non-object records the projection is an empty object.
    pub fn project(&self, fields: &[&str]) -> Value {
        let mut out = BTreeMap::new();
        if let Value::Object(own) = self {
            for f in fields {
                if let Some(v) = own.get(*f) {
                    out.insert(String::from(*f), v.clone());
                }
            }
        }
        Value::Object(out)
    }

    /// Extracts a single field of this record, Null when absent.
    pub fn extract(&self, field: &str) -> Value {
        self.get(field).cloned().unwrap_or(Value::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(String::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from(42).as_i64(), Some(42));
        assert_eq!(Value::from(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::from("g").as_str(), Some("g"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_as_number_coercion() {
        assert_eq!(Value::from(3).as_number(), Some(3.0));
        assert_eq!(Value::from(1.5).as_number(), Some(1.5));
        assert_eq!(Value::from("nope").as_number(), None);
        assert_eq!(Value::Null.as_number(), None);
    }

    #[test]
    fn test_object_field_order() {
        let a = Value::object([("x", Value::from(1)), ("y", Value::from(2))]);
        let b = Value::object([("y", Value::from(2)), ("x", Value::from(1))]);
        assert_eq!(a, b);
        assert_eq!(a.get("y"), Some(&Value::from(2)));
        assert_eq!(a.get("z"), None);
    }

    #[test]
    fn test_project() {
        let rec = Value::object([
            ("name", Value::from("hydra")),
            ("eyes", Value::from(18)),
            ("sex", Value::from("m")),
        ]);
        let slim = rec.project(&["name", "eyes", "absent"]);
        assert_eq!(
            slim,
            Value::object([("name", Value::from("hydra")), ("eyes", Value::from(18))])
        );
    }

    #[test]
    fn test_extract() {
        let rec = Value::object([("eyes", Value::from(2))]);
        assert_eq!(rec.extract("eyes"), Value::from(2));
        assert_eq!(rec.extract("name"), Value::Null);
        assert_eq!(Value::from(7).extract("eyes"), Value::Null);
    }

    #[test]
    fn test_nested_equality() {
        let a = Value::Array(vec![Value::from(1), Value::object([("k", Value::from("v"))])]);
        let b = Value::Array(vec![Value::from(1), Value::object([("k", Value::from("v"))])]);
        assert_eq!(a, b);
    }
}
