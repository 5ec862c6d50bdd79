//! The value universe the codec can carry.
//!
//! [`Value`] is a closed sum type: booleans, arbitrary-precision integers,
//! floats, text, byte blobs, ordered sequences and key-value mappings. Sets and
//! plain records are binding-level shapes; callers project them into
//! [`Value::Array`] and [`Value::Map`] before encoding.

use bytes::Bytes;
use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, ToPrimitive, Zero};

/// A dynamically typed value with a wire representation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Arbitrary-precision integer
    Int(BigInt),
    /// Floating-point number
    Float(f64),
    /// UTF-8 text
    Text(String),
    /// Raw byte blob
    Bytes(Bytes),
    /// Ordered sequence, duplicates allowed
    Array(Vec<Value>),
    /// Ordered key-value entries; keys may be any value
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Build a byte blob value
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Value::Bytes(data.into())
    }

    /// Build a map from entries
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array from items
    pub fn array<T, I>(items: I) -> Self
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Short name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Whether the value is a negative number
    pub fn is_negative(&self) -> bool {
        match self {
            Value::Int(n) => n.is_negative(),
            Value::Float(f) => *f < 0.0,
            _ => false,
        }
    }

    /// The boolean, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is one
    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Narrow an integer to `i64`; `None` if out of range or not an integer
    pub fn as_i64(&self) -> Option<i64> {
        self.as_int().and_then(ToPrimitive::to_i64)
    }

    /// Narrow an integer to `u64`; `None` if out of range or not an integer
    pub fn as_u64(&self) -> Option<u64> {
        self.as_int().and_then(ToPrimitive::to_u64)
    }

    /// Numeric value as `f64`, for both floats and integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => n.to_f64(),
            _ => None,
        }
    }

    /// The text, if this is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The blob, if this is a byte blob
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The items, if this is an array
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is a map
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// First map entry whose key is the text `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Whether this is an integer equal to zero
    pub fn is_zero_int(&self) -> bool {
        matches!(self, Value::Int(n) if n.is_zero())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Int(value)
    }
}

impl From<BigUint> for Value {
    fn from(value: BigUint) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value.into())
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(value: Vec<(Value, Value)>) -> Self {
        Value::Map(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("ab"), Value::Text("ab".to_string()));
        assert_eq!(Value::from(-3i32), Value::Int(BigInt::from(-3)));
        assert_eq!(Value::from(u128::MAX).as_u64(), None);
        assert_eq!(Value::from(1.5f32), Value::Float(1.5));
    }

    #[test]
    fn test_map_lookup() {
        let map = Value::map([("foo", Value::from(1)), ("bar", Value::from("x"))]);
        assert_eq!(map.get("bar").and_then(Value::as_str), Some("x"));
        assert_eq!(map.get("foo").and_then(Value::as_i64), Some(1));
        assert!(map.get("baz").is_none());
        assert!(Value::from(1).get("foo").is_none());
    }

    #[test]
    fn test_negative_detection() {
        assert!(Value::from(-1).is_negative());
        assert!(Value::from(-0.5).is_negative());
        assert!(!Value::from(0).is_negative());
        assert!(!Value::from("-1").is_negative());
    }

    #[test]
    fn test_as_f64_covers_integers() {
        assert_eq!(Value::from(7).as_f64(), Some(7.0));
        assert_eq!(Value::from(2.25).as_f64(), Some(2.25));
        assert_eq!(Value::from("7").as_f64(), None);
    }
}
