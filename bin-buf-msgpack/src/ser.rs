//! MessagePack value encoder

use alloc::string::String;
use alloc::vec::Vec;

use core::fmt;

use bin_buf::WriteBuf;

use crate::ext::Extensions;
use crate::marker::*;
use crate::timestamp::EXT_TIMESTAMP;
use crate::value::Value;

/// Encoding result
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Encoding error
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError {
    /// A string, binary, container or extension payload is too long for
    /// any MessagePack length prefix
    LengthLimit(usize),
    /// An error raised by a user-supplied extension encoder
    Extension(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::LengthLimit(len) => {
                write!(f, "length {} exceeds the MessagePack maximum of 4294967295", len)
            }
            EncodeError::Extension(msg) => {
                write!(f, "extension encoder failed: {}", msg)
            }
        }
    }
}

impl core::error::Error for EncodeError {}

/// Encode a single value to an owned byte vector.
///
/// A convenience wrapper creating a fresh [`Encoder`] without extensions.
pub fn to_vec(value: &Value) -> EncodeResult<Vec<u8>> {
    Encoder::new().encode(value)
}

/// MessagePack encoder with a reusable output buffer.
///
/// The encoder walks a [`Value`] tree and writes each node under the
/// smallest tag capable of representing it. The backing buffer grows as
/// needed and is retained between calls, so a long-lived encoder stops
/// allocating once it has seen its largest message; [`Encoder::resize_buffer`]
/// releases that memory again.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    out: WriteBuf,
    exts: Extensions,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder::default()
    }

    /// Create an encoder with a pre-sized output buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Encoder { out: WriteBuf::with_capacity(capacity), exts: Extensions::new() }
    }

    /// Create an encoder consulting `exts` before builtin classification.
    pub fn with_extensions(exts: Extensions) -> Self {
        Encoder { out: WriteBuf::new(), exts }
    }

    pub fn extensions(&self) -> &Extensions {
        &self.exts
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.exts
    }

    /// Pre-size the output buffer for an upcoming encode.
    pub fn reserve(&mut self, additional: usize) {
        self.out.reserve(additional);
    }

    /// Replace the backing buffer with a fresh one of `capacity` bytes,
    /// invalidating any outstanding [`Encoder::encode_view`] result.
    pub fn resize_buffer(&mut self, capacity: usize) {
        self.out.resize(capacity);
    }

    /// Encode `value` and return an owned copy of the bytes.
    pub fn encode(&mut self, value: &Value) -> EncodeResult<Vec<u8>> {
        self.encode_view(value).map(<[u8]>::to_vec)
    }

    /// Encode `value` and return a view into the encoder's own buffer.
    ///
    /// The view aliases the reusable buffer and is only valid until the
    /// next call on this encoder; callers needing the bytes beyond that
    /// copy them (or use [`Encoder::encode`]).
    pub fn encode_view(&mut self, value: &Value) -> EncodeResult<&[u8]> {
        self.out.clear();
        self.write_value(value)?;
        Ok(self.out.as_slice())
    }

    fn write_value(&mut self, value: &Value) -> EncodeResult<()> {
        if let Some(codec) = self.exts.match_value(value).cloned() {
            let payload = codec.encode(value)?;
            return self.write_ext(codec.tag(), &payload);
        }
        match value {
            Value::Nil => {
                self.out.push_u8(NIL);
                Ok(())
            }
            Value::Bool(v) => {
                self.out.push_u8(if *v { TRUE } else { FALSE });
                Ok(())
            }
            Value::Int(v) => {
                self.write_int(*v);
                Ok(())
            }
            Value::UInt(v) => {
                self.write_uint(*v);
                Ok(())
            }
            Value::Float(v) => {
                self.out.push_u8(FLOAT_64);
                self.out.push_f64(*v);
                Ok(())
            }
            Value::Str(v) => self.write_str(v),
            Value::Bin(v) => self.write_bin(v),
            Value::Array(items) => {
                self.write_array_len(items.len())?;
                for item in items {
                    self.write_value(item)?;
                }
                Ok(())
            }
            Value::Object(entries) => {
                self.write_map_len(entries.len())?;
                for (key, val) in entries {
                    self.write_str(key)?;
                    self.write_value(val)?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                self.write_map_len(entries.len())?;
                for (key, val) in entries {
                    self.write_value(key)?;
                    self.write_value(val)?;
                }
                Ok(())
            }
            Value::Ext(e) => self.write_ext(e.tag, &e.data),
            Value::Timestamp(t) => self.write_ext(EXT_TIMESTAMP, &t.encode_payload()),
        }
    }

    /// Write a signed integer under the smallest capable tag.
    /// Non-negative values use the unsigned families.
    fn write_int(&mut self, v: i64) {
        if v >= 0 {
            self.write_uint(v as u64)
        }
        else if v >= MIN_NEGFIXINT as i64 {
            self.out.push_u8(v as u8)
        }
        else if let Ok(v) = i8::try_from(v) {
            self.out.push_u8(INT_8);
            self.out.push_i8(v)
        }
        else if let Ok(v) = i16::try_from(v) {
            self.out.push_u8(INT_16);
            self.out.push_i16(v)
        }
        else if let Ok(v) = i32::try_from(v) {
            self.out.push_u8(INT_32);
            self.out.push_i32(v)
        }
        else {
            self.out.push_u8(INT_64);
            self.out.push_i64(v)
        }
    }

    /// Write an unsigned integer under the smallest capable tag.
    fn write_uint(&mut self, v: u64) {
        if v <= MAX_POSFIXINT as u64 {
            self.out.push_u8(v as u8)
        }
        else if let Ok(v) = u8::try_from(v) {
            self.out.push_u8(UINT_8);
            self.out.push_u8(v)
        }
        else if let Ok(v) = u16::try_from(v) {
            self.out.push_u8(UINT_16);
            self.out.push_u16(v)
        }
        else if let Ok(v) = u32::try_from(v) {
            self.out.push_u8(UINT_32);
            self.out.push_u32(v)
        }
        else {
            self.out.push_u8(UINT_64);
            self.out.push_u64(v)
        }
    }

    fn write_str(&mut self, v: &str) -> EncodeResult<()> {
        let len = v.len();
        if len <= MAX_FIXSTR_SIZE {
            self.out.push_u8(FIXSTR | (len as u8));
        }
        else if let Ok(len) = u8::try_from(len) {
            self.out.push_u8(STR_8);
            self.out.push_u8(len);
        }
        else if let Ok(len) = u16::try_from(len) {
            self.out.push_u8(STR_16);
            self.out.push_u16(len);
        }
        else if let Ok(len) = u32::try_from(len) {
            self.out.push_u8(STR_32);
            self.out.push_u32(len);
        }
        else {
            return Err(EncodeError::LengthLimit(len))
        }
        self.out.push_str(v);
        Ok(())
    }

    fn write_bin(&mut self, v: &[u8]) -> EncodeResult<()> {
        let len = v.len();
        if let Ok(len) = u8::try_from(len) {
            self.out.push_u8(BIN_8);
            self.out.push_u8(len);
        }
        else if let Ok(len) = u16::try_from(len) {
            self.out.push_u8(BIN_16);
            self.out.push_u16(len);
        }
        else if let Ok(len) = u32::try_from(len) {
            self.out.push_u8(BIN_32);
            self.out.push_u32(len);
        }
        else {
            return Err(EncodeError::LengthLimit(len))
        }
        self.out.push_slice(v);
        Ok(())
    }

    fn write_array_len(&mut self, len: usize) -> EncodeResult<()> {
        if len <= MAX_FIXARRAY_SIZE {
            self.out.push_u8(FIXARRAY | (len as u8));
        }
        else if let Ok(len) = u16::try_from(len) {
            self.out.push_u8(ARRAY_16);
            self.out.push_u16(len);
        }
        else if let Ok(len) = u32::try_from(len) {
            self.out.push_u8(ARRAY_32);
            self.out.push_u32(len);
        }
        else {
            return Err(EncodeError::LengthLimit(len))
        }
        Ok(())
    }

    fn write_map_len(&mut self, len: usize) -> EncodeResult<()> {
        if len <= MAX_FIXMAP_SIZE {
            self.out.push_u8(FIXMAP | (len as u8));
        }
        else if let Ok(len) = u16::try_from(len) {
            self.out.push_u8(MAP_16);
            self.out.push_u16(len);
        }
        else if let Ok(len) = u32::try_from(len) {
            self.out.push_u8(MAP_32);
            self.out.push_u32(len);
        }
        else {
            return Err(EncodeError::LengthLimit(len))
        }
        Ok(())
    }

    /// Write an extension header and payload. Payloads of exactly
    /// 1/2/4/8/16 bytes take the one-byte-overhead fixext form.
    fn write_ext(&mut self, tag: i8, data: &[u8]) -> EncodeResult<()> {
        match data.len() {
            1 => self.out.push_u8(FIXEXT_1),
            2 => self.out.push_u8(FIXEXT_2),
            4 => self.out.push_u8(FIXEXT_4),
            8 => self.out.push_u8(FIXEXT_8),
            16 => self.out.push_u8(FIXEXT_16),
            len => {
                if let Ok(len) = u8::try_from(len) {
                    self.out.push_u8(EXT_8);
                    self.out.push_u8(len);
                }
                else if let Ok(len) = u16::try_from(len) {
                    self.out.push_u8(EXT_16);
                    self.out.push_u16(len);
                }
                else if let Ok(len) = u32::try_from(len) {
                    self.out.push_u8(EXT_32);
                    self.out.push_u32(len);
                }
                else {
                    return Err(EncodeError::LengthLimit(len))
                }
            }
        }
        self.out.push_i8(tag);
        self.out.push_slice(data);
        Ok(())
    }
}
