//! The dynamically typed value tree the codec encodes and decodes.

use alloc::string::String;
use alloc::vec::Vec;

use core::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::timestamp::Timestamp;

/// A single MessagePack value.
///
/// Mappings come in two flavours: [`Value::Object`] keeps keys coerced to
/// strings in insertion order, [`Value::Map`] keeps arbitrary decoded keys
/// with their original identity. Which one a decode produces is governed
/// by [`MapMode`](crate::MapMode).
///
/// Integer equality is numeric: `Int(5) == UInt(5)`, so a non-negative
/// integer compares equal no matter which variant carried it.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bin(Vec<u8>),
    Array(Vec<Value>),
    /// String-keyed mapping in insertion order.
    Object(Vec<(String, Value)>),
    /// Mapping whose keys may be any value, in insertion order.
    Map(Vec<(Value, Value)>),
    /// An extension value with no registered codec.
    Ext(Ext),
    /// The built-in extension with type `-1`.
    Timestamp(Timestamp),
}

/// An opaque extension value: a signed type tag plus its payload bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ext {
    pub tag: i8,
    pub data: Vec<u8>,
}

impl Ext {
    pub fn new(tag: i8, data: Vec<u8>) -> Self {
        Ext { tag, data }
    }
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a signed 64-bit integer, if it is one or fits in one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// The value as an unsigned 64-bit integer, if non-negative integral.
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::UInt(v) => Some(*v),
            Value::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// The value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            Value::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bin(&self) -> Option<&[u8]> {
        match self {
            Value::Bin(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ext(&self) -> Option<&Ext> {
        match self {
            Value::Ext(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Nil, Nil) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (UInt(a), UInt(b)) => a == b,
            (Int(a), UInt(b)) | (UInt(b), Int(a)) => *a >= 0 && *a as u64 == *b,
            (Float(a), Float(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Bin(a), Bin(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Ext(a), Ext(b)) => a == b,
            (Timestamp(a), Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident: $($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v.into())
            }
        }
    )*};
}

impl_from_int!(Int: i8, i16, i32, i64);
impl_from_int!(UInt: u8, u16, u32, u64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bin(v.into())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bin(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Ext> for Value {
    fn from(v: Ext) -> Self {
        Value::Ext(v)
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Timestamp(v)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::UInt(v) => serializer.serialize_u64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Str(v) => serializer.serialize_str(v),
            Value::Bin(v) => serializer.serialize_bytes(v),
            Value::Array(v) => v.serialize(serializer),
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Ext(e) => {
                let mut tup = serializer.serialize_tuple(2)?;
                tup.serialize_element(&e.tag)?;
                tup.serialize_element(&e.data)?;
                tup.end()
            }
            Value::Timestamp(t) => {
                let mut tup = serializer.serialize_tuple(2)?;
                tup.serialize_element(&t.sec)?;
                tup.serialize_element(&t.nsec)?;
                tup.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any self-describing value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E>
        where E: de::Error
    {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E>
        where E: de::Error
    {
        if v >= 0 {
            Ok(Value::UInt(v as u64))
        }
        else {
            Ok(Value::Int(v))
        }
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E>
        where E: de::Error
    {
        Ok(Value::UInt(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E>
        where E: de::Error
    {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E>
        where E: de::Error
    {
        Ok(Value::Str(v.into()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E>
        where E: de::Error
    {
        Ok(Value::Str(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Value, E>
        where E: de::Error
    {
        Ok(Value::Bin(v.into()))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Value, E>
        where E: de::Error
    {
        Ok(Value::Bin(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E>
        where E: de::Error
    {
        Ok(Value::Nil)
    }

    fn visit_none<E>(self) -> Result<Value, E>
        where E: de::Error
    {
        Ok(Value::Nil)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
        where D: Deserializer<'de>
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
        where A: SeqAccess<'de>
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
        where A: MapAccess<'de>
    {
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry()? {
            entries.push(entry);
        }
        if entries.iter().all(|(k, _)| matches!(k, Value::Str(_))) {
            let entries = entries.into_iter()
                .map(|(k, v)| match k {
                    Value::Str(k) => (k, v),
                    _ => unreachable!()
                })
                .collect();
            Ok(Value::Object(entries))
        }
        else {
            Ok(Value::Map(entries))
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
        where D: Deserializer<'de>
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}
