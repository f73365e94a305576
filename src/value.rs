//! `Value`s hold arbitrary decoded bencode data as an owned tree. A tree
//! is built wholly by the decoder in one pass (or programmatically by a
//! caller before encoding) and has no mutation API beyond plain ownership.

use std::collections::BTreeMap;

use crate::encoding::{self, SingleItemEncoder, ToBencode};

/// A single bencode value: the closed sum over the four grammar shapes.
///
/// Dictionaries are backed by a [`BTreeMap`] keyed on raw bytes, so
/// iterating a dictionary always visits keys in ascending raw-byte order.
/// Canonical key ordering on encode falls out of the map type; insertion
/// order is never observable.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A byte string; not guaranteed to be UTF-8.
    Bytes(Vec<u8>),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A dictionary mapping byte-string keys to values.
    Dict(BTreeMap<Vec<u8>, Value>),
}

impl Value {
    /// Return the integer payload, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(integer) => Some(*integer),
            _ => None,
        }
    }

    /// Return the raw bytes, if this is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Return the byte string as text, if it happens to be valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Return the elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Return the underlying map, if this is a dictionary.
    pub fn as_dict(&self) -> Option<&BTreeMap<Vec<u8>, Value>> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Look up a dictionary entry by key. Returns `None` if this is not a
    /// dictionary or the key is absent.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        match self {
            Value::Dict(dict) => dict.get(key.as_ref()),
            _ => None,
        }
    }
}

impl ToBencode for Value {
    const MAX_DEPTH: usize = crate::DEFAULT_MAX_DEPTH;

    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), encoding::Error> {
        match self {
            Value::Integer(integer) => encoder.emit_int(*integer),
            Value::Bytes(bytes) => encoder.emit_bytes(bytes),
            Value::List(list) => encoder.emit_list(|e| {
                for item in list {
                    e.emit(item)?;
                }
                Ok(())
            }),
            Value::Dict(dict) => encoder.emit_dict(|mut e| {
                for (key, value) in dict {
                    e.emit_pair(key, value)?;
                }
                Ok(())
            }),
        }
    }
}

macro_rules! impl_value_from_integer {
    ($($type:ty)*) => {$(
        impl From<$type> for Value {
            fn from(integer: $type) -> Self {
                Value::Integer(i64::from(integer))
            }
        }
    )*}
}

impl_value_from_integer!(i8 i16 i32 i64 u8 u16 u32);

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Bytes(text.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Bytes(text.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(list)
    }
}

impl From<BTreeMap<Vec<u8>, Value>> for Value {
    fn from(dict: BTreeMap<Vec<u8>, Value>) -> Self {
        Value::Dict(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(value: Value, expected: impl AsRef<[u8]>) {
        let expected = expected.as_ref();

        let encoded = match crate::encode(&value) {
            Ok(bytes) => bytes,
            Err(err) => panic!("Failed to encode `{:?}`: {}", value, err),
        };

        if encoded != expected {
            panic!(
                "Expected `{:?}` to encode as `{}`, but got `{}`",
                value,
                String::from_utf8_lossy(expected),
                String::from_utf8_lossy(&encoded)
            )
        }

        let decoded = match crate::parse(&encoded) {
            Ok(decoded) => decoded,
            Err(err) => panic!(
                "Failed to decode value from `{}`: {}",
                String::from_utf8_lossy(&encoded),
                err,
            ),
        };

        assert_eq!(decoded, value);
    }

    #[test]
    fn bytes() {
        case(Value::Bytes(vec![1, 2, 3]), b"3:\x01\x02\x03");
        case(Value::Bytes(Vec::new()), "0:");
    }

    #[test]
    fn dict() {
        case(Value::Dict(BTreeMap::new()), "de");

        let mut dict = BTreeMap::new();
        dict.insert(b"foo".to_vec(), Value::Integer(1));
        dict.insert(b"bar".to_vec(), Value::Integer(2));
        case(Value::Dict(dict), "d3:bari2e3:fooi1ee");
    }

    #[test]
    fn integer() {
        case(Value::Integer(0), "i0e");
        case(Value::Integer(-1), "i-1e");
        case(Value::Integer(i64::MAX), "i9223372036854775807e");
        case(Value::Integer(i64::MIN), "i-9223372036854775808e");
    }

    #[test]
    fn list() {
        case(Value::List(Vec::new()), "le");
        case(
            Value::List(vec![Value::Integer(0), Value::Bytes(vec![1, 2, 3])]),
            b"li0e3:\x01\x02\x03e",
        );
    }

    #[test]
    fn accessors() {
        let value = crate::parse(b"d3:fooli1ei2ee3:bar3:baze").unwrap();

        assert!(value.as_dict().is_some());
        assert_eq!(None, value.as_integer());

        let list = value.get("foo").and_then(Value::as_list).unwrap();
        assert_eq!(Some(1), list[0].as_integer());
        assert_eq!(Some(2), list[1].as_integer());

        assert_eq!(Some("baz"), value.get("bar").unwrap().as_str());
        assert_eq!(Some(&b"baz"[..]), value.get("bar").unwrap().as_bytes());
        assert_eq!(None, value.get("qux"));
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::Integer(7), Value::from(7_u8));
        assert_eq!(Value::Integer(-7), Value::from(-7_i64));
        assert_eq!(Value::Bytes(b"foo".to_vec()), Value::from("foo"));
        assert_eq!(
            Value::List(vec![Value::Integer(1)]),
            Value::from(vec![Value::Integer(1)])
        );
    }
}
