//! MessagePack value decoder

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use core::fmt;
use core::num::TryFromIntError;
use core::str;

use bin_buf::{ReadError, Reader};

use crate::ext::Extensions;
use crate::marker::*;
use crate::timestamp::{Timestamp, EXT_TIMESTAMP};
use crate::value::{Ext, Value};

/// Decoding result
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Decoding error
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// EOF while decoding
    UnexpectedEof,
    /// A declared length does not fit the host address space
    LengthOverflow,
    /// String bytes are not valid UTF-8 (strict mode only)
    InvalidUtf8,
    /// No decoder registered for an extension type (strict mode only)
    UnknownExtension(i8),
    /// A timestamp extension payload has an impossible length
    MalformedTimestamp(usize),
    /// An error raised by a user-supplied extension decoder
    Extension(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnexpectedEof => f.write_str("unexpected end of MessagePack input"),
            DecodeError::LengthOverflow => f.write_str("declared length exceeds the host address space"),
            DecodeError::InvalidUtf8 => f.write_str("string bytes are not valid UTF-8"),
            DecodeError::UnknownExtension(tag) => {
                write!(f, "no decoder registered for extension type {}", tag)
            }
            DecodeError::MalformedTimestamp(len) => {
                write!(f, "invalid timestamp payload length {}, expected 4, 8 or 12", len)
            }
            DecodeError::Extension(msg) => write!(f, "extension decoder failed: {}", msg),
        }
    }
}

impl core::error::Error for DecodeError {}

impl From<ReadError> for DecodeError {
    fn from(_err: ReadError) -> Self {
        DecodeError::UnexpectedEof
    }
}

impl From<TryFromIntError> for DecodeError {
    fn from(_err: TryFromIntError) -> Self {
        DecodeError::LengthOverflow
    }
}

/// How maps are reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapMode {
    /// Two-phase: decode optimistically into a string-keyed
    /// [`Value::Object`]; on the first composite key rewind to the start
    /// of the map and re-decode it once into a [`Value::Map`].
    #[default]
    Auto,
    /// Always produce [`Value::Object`], coercing every key to a string.
    /// Lossy for composite keys.
    StringKeys,
    /// Always produce [`Value::Map`], preserving key identity.
    ValueKeys,
}

/// What to do with string bytes that are not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Utf8Policy {
    /// Substitute a [`Value::Bin`] carrying the raw bytes.
    #[default]
    Bytes,
    /// Fail the decode with [`DecodeError::InvalidUtf8`].
    Fail,
}

/// What to do with an extension type no codec is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtPolicy {
    /// Substitute an opaque [`Value::Ext`] carrying tag and payload.
    #[default]
    Opaque,
    /// Fail the decode with [`DecodeError::UnknownExtension`].
    Fail,
}

/// Named decoding options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodeOptions {
    /// Substitute for the reserved `0xc1` byte, [`Value::Nil`] by default.
    pub absent: Value,
    pub invalid_utf8: Utf8Policy,
    pub unknown_ext: ExtPolicy,
    pub map_mode: MapMode,
}

/// Decode a single value from the start of `input` with default options.
///
/// Trailing bytes after the first complete value are ignored.
pub fn from_slice(input: &[u8]) -> DecodeResult<Value> {
    Decoder::new().decode(input)
}

/// Wire categories, one per possible leading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    PosFixInt, FixMap, FixArray, FixStr, Nil, Reserved, False, True,
    Bin8, Bin16, Bin32, Ext8, Ext16, Ext32, Float32, Float64,
    Uint8, Uint16, Uint32, Uint64, Int8, Int16, Int32, Int64,
    FixExt1, FixExt2, FixExt4, FixExt8, FixExt16,
    Str8, Str16, Str32, Array16, Array32, Map16, Map32, NegFixInt,
}

/// Dispatch table mapping every leading byte to its wire category.
static KIND: [Kind; 256] = kind_table();

const fn kind_table() -> [Kind; 256] {
    let mut table = [Kind::Reserved; 256];
    let mut code = 0usize;
    while code < 256 {
        table[code] = match code as u8 {
            MIN_POSFIXINT..=MAX_POSFIXINT => Kind::PosFixInt,
            FIXMAP..=FIXMAP_MAX => Kind::FixMap,
            FIXARRAY..=FIXARRAY_MAX => Kind::FixArray,
            FIXSTR..=FIXSTR_MAX => Kind::FixStr,
            NIL => Kind::Nil,
            RESERVED => Kind::Reserved,
            FALSE => Kind::False,
            TRUE => Kind::True,
            BIN_8 => Kind::Bin8,
            BIN_16 => Kind::Bin16,
            BIN_32 => Kind::Bin32,
            EXT_8 => Kind::Ext8,
            EXT_16 => Kind::Ext16,
            EXT_32 => Kind::Ext32,
            FLOAT_32 => Kind::Float32,
            FLOAT_64 => Kind::Float64,
            UINT_8 => Kind::Uint8,
            UINT_16 => Kind::Uint16,
            UINT_32 => Kind::Uint32,
            UINT_64 => Kind::Uint64,
            INT_8 => Kind::Int8,
            INT_16 => Kind::Int16,
            INT_32 => Kind::Int32,
            INT_64 => Kind::Int64,
            FIXEXT_1 => Kind::FixExt1,
            FIXEXT_2 => Kind::FixExt2,
            FIXEXT_4 => Kind::FixExt4,
            FIXEXT_8 => Kind::FixExt8,
            FIXEXT_16 => Kind::FixExt16,
            STR_8 => Kind::Str8,
            STR_16 => Kind::Str16,
            STR_32 => Kind::Str32,
            ARRAY_16 => Kind::Array16,
            ARRAY_32 => Kind::Array32,
            MAP_16 => Kind::Map16,
            MAP_32 => Kind::Map32,
            NEGFIXINT..=0xff => Kind::NegFixInt,
        };
        code += 1;
    }
    table
}

/// MessagePack decoder with configurable options and extension codecs.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    exts: Extensions,
    opts: DecodeOptions,
}

impl Decoder {
    pub fn new() -> Self {
        Decoder::default()
    }

    /// Create a decoder consulting `exts` for extension payloads.
    pub fn with_extensions(exts: Extensions) -> Self {
        Decoder { exts, opts: DecodeOptions::default() }
    }

    /// Create a decoder with the given options.
    pub fn with_options(opts: DecodeOptions) -> Self {
        Decoder { exts: Extensions::new(), opts }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.opts
    }

    pub fn options_mut(&mut self) -> &mut DecodeOptions {
        &mut self.opts
    }

    pub fn extensions(&self) -> &Extensions {
        &self.exts
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.exts
    }

    /// Decode exactly one value from the start of `input`.
    ///
    /// Trailing bytes after the first complete value are ignored.
    pub fn decode(&self, input: &[u8]) -> DecodeResult<Value> {
        let mut rd = Reader::new(input);
        self.read_value(&mut rd)
    }

    fn read_value(&self, rd: &mut Reader) -> DecodeResult<Value> {
        let c = rd.fetch()?;
        match KIND[c as usize] {
            Kind::PosFixInt => Ok(Value::UInt(c.into())),
            Kind::NegFixInt => Ok(Value::Int((c as i8).into())),
            Kind::FixMap => self.read_map(rd, (c as usize) & MAX_FIXMAP_SIZE),
            Kind::FixArray => self.read_array(rd, (c as usize) & MAX_FIXARRAY_SIZE),
            Kind::FixStr => self.read_str(rd, (c as usize) & MAX_FIXSTR_SIZE),
            Kind::Nil => Ok(Value::Nil),
            Kind::Reserved => Ok(self.opts.absent.clone()),
            Kind::False => Ok(Value::Bool(false)),
            Kind::True => Ok(Value::Bool(true)),
            Kind::Bin8 => {
                let len = rd.fetch_u8()?.into();
                self.read_bin(rd, len)
            }
            Kind::Bin16 => {
                let len = rd.fetch_u16()?.into();
                self.read_bin(rd, len)
            }
            Kind::Bin32 => {
                let len = rd.fetch_u32()?.try_into()?;
                self.read_bin(rd, len)
            }
            Kind::Ext8 => {
                let len = rd.fetch_u8()?.into();
                self.read_ext(rd, len)
            }
            Kind::Ext16 => {
                let len = rd.fetch_u16()?.into();
                self.read_ext(rd, len)
            }
            Kind::Ext32 => {
                let len = rd.fetch_u32()?.try_into()?;
                self.read_ext(rd, len)
            }
            Kind::Float32 => Ok(Value::Float(rd.fetch_f32()?.into())),
            Kind::Float64 => Ok(Value::Float(rd.fetch_f64()?)),
            Kind::Uint8 => Ok(Value::UInt(rd.fetch_u8()?.into())),
            Kind::Uint16 => Ok(Value::UInt(rd.fetch_u16()?.into())),
            Kind::Uint32 => Ok(Value::UInt(rd.fetch_u32()?.into())),
            Kind::Uint64 => Ok(Value::UInt(rd.fetch_u64()?)),
            Kind::Int8 => Ok(Value::Int(rd.fetch_i8()?.into())),
            Kind::Int16 => Ok(Value::Int(rd.fetch_i16()?.into())),
            Kind::Int32 => Ok(Value::Int(rd.fetch_i32()?.into())),
            Kind::Int64 => Ok(Value::Int(rd.fetch_i64()?)),
            Kind::FixExt1 => self.read_ext(rd, 1),
            Kind::FixExt2 => self.read_ext(rd, 2),
            Kind::FixExt4 => self.read_ext(rd, 4),
            Kind::FixExt8 => self.read_ext(rd, 8),
            Kind::FixExt16 => self.read_ext(rd, 16),
            Kind::Str8 => {
                let len = rd.fetch_u8()?.into();
                self.read_str(rd, len)
            }
            Kind::Str16 => {
                let len = rd.fetch_u16()?.into();
                self.read_str(rd, len)
            }
            Kind::Str32 => {
                let len = rd.fetch_u32()?.try_into()?;
                self.read_str(rd, len)
            }
            Kind::Array16 => {
                let len = rd.fetch_u16()?.into();
                self.read_array(rd, len)
            }
            Kind::Array32 => {
                let len = rd.fetch_u32()?.try_into()?;
                self.read_array(rd, len)
            }
            Kind::Map16 => {
                let len = rd.fetch_u16()?.into();
                self.read_map(rd, len)
            }
            Kind::Map32 => {
                let len = rd.fetch_u32()?.try_into()?;
                self.read_map(rd, len)
            }
        }
    }

    fn read_str(&self, rd: &mut Reader, len: usize) -> DecodeResult<Value> {
        let bytes = rd.fetch_slice(len)?;
        match str::from_utf8(bytes) {
            Ok(s) => Ok(Value::Str(s.into())),
            Err(_) => match self.opts.invalid_utf8 {
                Utf8Policy::Bytes => Ok(Value::Bin(bytes.into())),
                Utf8Policy::Fail => Err(DecodeError::InvalidUtf8),
            },
        }
    }

    fn read_bin(&self, rd: &mut Reader, len: usize) -> DecodeResult<Value> {
        Ok(Value::Bin(rd.fetch_slice(len)?.into()))
    }

    fn read_array(&self, rd: &mut Reader, len: usize) -> DecodeResult<Value> {
        // every element takes at least one byte, so a count beyond the
        // remaining input cannot be satisfied; check before reserving
        if len > rd.remaining() {
            return Err(DecodeError::UnexpectedEof)
        }
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.read_value(rd)?);
        }
        Ok(Value::Array(items))
    }

    fn read_map(&self, rd: &mut Reader, len: usize) -> DecodeResult<Value> {
        if len > rd.remaining() {
            return Err(DecodeError::UnexpectedEof)
        }
        match self.opts.map_mode {
            MapMode::ValueKeys => self.read_map_values(rd, len),
            MapMode::StringKeys => {
                let mut entries = Vec::with_capacity(len);
                for _ in 0..len {
                    let key = self.read_value(rd)?;
                    let val = self.read_value(rd)?;
                    entries.push((lossy_key(&key), val));
                }
                Ok(Value::Object(entries))
            }
            MapMode::Auto => {
                let start = rd.pos();
                let mut entries = Vec::with_capacity(len);
                for _ in 0..len {
                    let key = self.read_value(rd)?;
                    match primitive_key(&key) {
                        Some(key) => {
                            let val = self.read_value(rd)?;
                            entries.push((key, val));
                        }
                        None => {
                            // composite key: drop the partial object,
                            // rewind and re-decode once with full key
                            // identity
                            rd.seek(start);
                            return self.read_map_values(rd, len)
                        }
                    }
                }
                Ok(Value::Object(entries))
            }
        }
    }

    fn read_map_values(&self, rd: &mut Reader, len: usize) -> DecodeResult<Value> {
        let mut entries = Vec::with_capacity(len);
        for _ in 0..len {
            let key = self.read_value(rd)?;
            let val = self.read_value(rd)?;
            entries.push((key, val));
        }
        Ok(Value::Map(entries))
    }

    // registered codecs win over the builtin timestamp, mirroring the
    // encode side where matchers run before builtin classification
    fn read_ext(&self, rd: &mut Reader, len: usize) -> DecodeResult<Value> {
        let tag = rd.fetch_i8()?;
        let data = rd.fetch_slice(len)?;
        if let Some(codec) = self.exts.by_tag(tag) {
            return codec.decode(data)
        }
        if tag == EXT_TIMESTAMP {
            return Timestamp::decode_payload(data).map(Value::Timestamp)
        }
        match self.opts.unknown_ext {
            ExtPolicy::Opaque => Ok(Value::Ext(Ext::new(tag, data.into()))),
            ExtPolicy::Fail => Err(DecodeError::UnknownExtension(tag)),
        }
    }
}

/// String coercion for the keys the optimistic object phase accepts.
/// Composite keys return `None` and trigger the [`Value::Map`] fallback.
fn primitive_key(key: &Value) -> Option<String> {
    match key {
        Value::Str(s) => Some(s.clone()),
        Value::Bool(v) => Some((if *v { "true" } else { "false" }).into()),
        Value::Int(v) => Some(v.to_string()),
        Value::UInt(v) => Some(v.to_string()),
        Value::Float(v) => Some(v.to_string()),
        _ => None,
    }
}

/// Total key coercion for [`MapMode::StringKeys`]. Composite keys
/// flatten to their category name.
fn lossy_key(key: &Value) -> String {
    match key {
        Value::Str(s) => s.clone(),
        Value::Bool(v) => (if *v { "true" } else { "false" }).into(),
        Value::Int(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Nil => "null".into(),
        Value::Bin(_) => "bin".into(),
        Value::Array(_) => "array".into(),
        Value::Object(_) | Value::Map(_) => "map".into(),
        Value::Ext(_) => "ext".into(),
        Value::Timestamp(_) => "timestamp".into(),
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use super::*;

    #[test]
    fn test_de_scalars() {
        assert_eq!(from_slice(&[0xc0]), Ok(Value::Nil));
        assert_eq!(from_slice(&[0xc2]), Ok(Value::Bool(false)));
        assert_eq!(from_slice(&[0xc3]), Ok(Value::Bool(true)));
        assert_eq!(from_slice(&[0x00]), Ok(Value::UInt(0)));
        assert_eq!(from_slice(&[0x7f]), Ok(Value::UInt(127)));
        assert_eq!(from_slice(&[0xff]), Ok(Value::Int(-1)));
        assert_eq!(from_slice(&[0xe0]), Ok(Value::Int(-32)));
        assert_eq!(from_slice(&[]), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_de_reserved_byte_is_absent() {
        assert_eq!(from_slice(&[0xc1]), Ok(Value::Nil));
        assert_eq!(
            from_slice(&[0x92, 0xc1, 0x01]),
            Ok(Value::Array(vec![Value::Nil, Value::UInt(1)]))
        );
        let decoder = Decoder::with_options(DecodeOptions {
            absent: Value::Str("absent".into()),
            ..DecodeOptions::default()
        });
        assert_eq!(decoder.decode(&[0xc1]), Ok(Value::Str("absent".into())));
    }

    #[test]
    fn test_de_integers() {
        assert_eq!(from_slice(&[0xcc, 200]), Ok(Value::UInt(200)));
        assert_eq!(from_slice(&[0xcd, 1, 0]), Ok(Value::UInt(256)));
        assert_eq!(from_slice(&[0xce, 0, 1, 0, 0]), Ok(Value::UInt(65536)));
        assert_eq!(
            from_slice(&[0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
            Ok(Value::UInt(u64::MAX))
        );
        assert_eq!(from_slice(&[0xd0, 0x80]), Ok(Value::Int(-128)));
        assert_eq!(from_slice(&[0xd1, 0x80, 0x00]), Ok(Value::Int(-32768)));
        assert_eq!(
            from_slice(&[0xd2, 0xff, 0xff, 0x7f, 0xff]),
            Ok(Value::Int(-32769))
        );
        assert_eq!(
            from_slice(&[0xd3, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
            Ok(Value::Int(-1))
        );
        for code in [0xcc, 0xcd, 0xce, 0xcf, 0xd0, 0xd1, 0xd2, 0xd3] {
            assert_eq!(from_slice(&[code]), Err(DecodeError::UnexpectedEof));
        }
    }

    #[test]
    fn test_de_floats_widen() {
        let mut input = vec![0xca];
        input.extend_from_slice(&(-2.5f32).to_be_bytes());
        assert_eq!(from_slice(&input), Ok(Value::Float(-2.5)));
        let mut input = vec![0xcb];
        input.extend_from_slice(&0.1f64.to_be_bytes());
        assert_eq!(from_slice(&input), Ok(Value::Float(0.1)));
    }

    #[test]
    fn test_de_str_and_bin() {
        assert_eq!(from_slice(b"\xa5hello"), Ok(Value::Str("hello".into())));
        assert_eq!(from_slice(b"\xd9\x03abc"), Ok(Value::Str("abc".into())));
        assert_eq!(from_slice(b"\xda\x00\x01x"), Ok(Value::Str("x".into())));
        assert_eq!(
            from_slice(b"\xdb\x00\x00\x00\x01x"),
            Ok(Value::Str("x".into()))
        );
        assert_eq!(from_slice(&[0xc4, 2, 7, 8]), Ok(Value::Bin(vec![7, 8])));
        assert_eq!(from_slice(&[0xa5, b'h', b'i']), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_de_invalid_utf8_policies() {
        // \xff\xfe is not valid UTF-8
        let input = [0xa2, 0xff, 0xfe];
        assert_eq!(from_slice(&input), Ok(Value::Bin(vec![0xff, 0xfe])));
        let strict = Decoder::with_options(DecodeOptions {
            invalid_utf8: Utf8Policy::Fail,
            ..DecodeOptions::default()
        });
        assert_eq!(strict.decode(&input), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn test_de_arrays() {
        assert_eq!(from_slice(&[0x90]), Ok(Value::Array(vec![])));
        assert_eq!(
            from_slice(&[0x93, 0x01, 0xc2, 0xa1, b'x']),
            Ok(Value::Array(vec![
                Value::UInt(1),
                Value::Bool(false),
                Value::Str("x".into()),
            ]))
        );
        assert_eq!(
            from_slice(&[0xdc, 0, 2, 0x01, 0x02]),
            Ok(Value::Array(vec![Value::UInt(1), Value::UInt(2)]))
        );
        assert_eq!(
            from_slice(&[0xdd, 0, 0, 0, 2, 0x01, 0x02]),
            Ok(Value::Array(vec![Value::UInt(1), Value::UInt(2)]))
        );
        // declared count beyond the input fails before any allocation
        assert_eq!(
            from_slice(&[0xdd, 0xff, 0xff, 0xff, 0xff]),
            Err(DecodeError::UnexpectedEof)
        );
        assert_eq!(from_slice(&[0x92, 0x01]), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_de_map_auto_object() {
        let value = from_slice(&[0x82, 0xa1, b'a', 0x01, 0xa1, b'b', 0xc3]).unwrap();
        assert_eq!(
            value,
            Value::Object(vec![
                ("a".into(), Value::UInt(1)),
                ("b".into(), Value::Bool(true)),
            ])
        );
    }

    #[test]
    fn test_de_map_auto_coerces_primitive_keys() {
        // {7: "x", -1: "y", true: "z"}
        let input = [0x83, 0x07, 0xa1, b'x', 0xff, 0xa1, b'y', 0xc3, 0xa1, b'z'];
        assert_eq!(
            from_slice(&input),
            Ok(Value::Object(vec![
                ("7".into(), Value::Str("x".into())),
                ("-1".into(), Value::Str("y".into())),
                ("true".into(), Value::Str("z".into())),
            ]))
        );
    }

    #[test]
    fn test_de_map_auto_falls_back_on_composite_key() {
        // {"a": 1, [2]: 3} - the second key forces the value-keyed form
        let input = [0x82, 0xa1, b'a', 0x01, 0x91, 0x02, 0x03];
        assert_eq!(
            from_slice(&input),
            Ok(Value::Map(vec![
                (Value::Str("a".into()), Value::UInt(1)),
                (Value::Array(vec![Value::UInt(2)]), Value::UInt(3)),
            ]))
        );
    }

    #[test]
    fn test_de_map_fallback_is_per_map() {
        // {"outer": {[1]: 2}} - inner map falls back, outer stays an object
        let input = [0x81, 0xa5, b'o', b'u', b't', b'e', b'r', 0x81, 0x91, 0x01, 0x02];
        assert_eq!(
            from_slice(&input),
            Ok(Value::Object(vec![(
                "outer".into(),
                Value::Map(vec![(
                    Value::Array(vec![Value::UInt(1)]),
                    Value::UInt(2),
                )]),
            )]))
        );
    }

    #[test]
    fn test_de_map_value_keys_mode() {
        let decoder = Decoder::with_options(DecodeOptions {
            map_mode: MapMode::ValueKeys,
            ..DecodeOptions::default()
        });
        assert_eq!(
            decoder.decode(&[0x81, 0xa1, b'a', 0x01]),
            Ok(Value::Map(vec![(Value::Str("a".into()), Value::UInt(1))]))
        );
    }

    #[test]
    fn test_de_map_string_keys_mode() {
        let decoder = Decoder::with_options(DecodeOptions {
            map_mode: MapMode::StringKeys,
            ..DecodeOptions::default()
        });
        // {[1]: 2, 3.5: 4} coerces every key
        let input = [0x82, 0x91, 0x01, 0x02, 0xcb, 0x40, 0x0c, 0, 0, 0, 0, 0, 0, 0x04];
        assert_eq!(
            decoder.decode(&input),
            Ok(Value::Object(vec![
                ("array".into(), Value::UInt(2)),
                ("3.5".into(), Value::UInt(4)),
            ]))
        );
    }

    #[test]
    fn test_de_unknown_extension_policies() {
        let input = [0xd4, 42, 7];
        assert_eq!(from_slice(&input), Ok(Value::Ext(Ext::new(42, vec![7]))));
        let strict = Decoder::with_options(DecodeOptions {
            unknown_ext: ExtPolicy::Fail,
            ..DecodeOptions::default()
        });
        assert_eq!(strict.decode(&input), Err(DecodeError::UnknownExtension(42)));
    }

    #[test]
    fn test_de_registered_extension() {
        let mut exts = Extensions::new();
        exts.register(
            42,
            |_| false,
            |_| Ok(vec![]),
            |data| Ok(Value::UInt(data[0].into())),
        );
        let decoder = Decoder::with_extensions(exts);
        assert_eq!(decoder.decode(&[0xd4, 42, 7]), Ok(Value::UInt(7)));
    }

    #[test]
    fn test_de_extension_error_aborts() {
        let mut exts = Extensions::new();
        exts.register(
            9,
            |_| false,
            |_| Ok(vec![]),
            |_| Err(DecodeError::Extension("bad payload".into())),
        );
        let decoder = Decoder::with_extensions(exts);
        assert_eq!(
            decoder.decode(&[0x91, 0xd4, 9, 0]),
            Err(DecodeError::Extension("bad payload".into()))
        );
    }

    #[test]
    fn test_de_registered_codec_overrides_builtin_timestamp() {
        let input = [0xd6, 0xff, 0, 0, 0, 1];
        assert_eq!(
            from_slice(&input),
            Ok(Value::Timestamp(Timestamp::new(1, 0)))
        );
        let mut exts = Extensions::new();
        exts.register(
            -1,
            |_| false,
            |_| Ok(vec![]),
            |data| Ok(Value::Bin(data.into())),
        );
        let decoder = Decoder::with_extensions(exts);
        assert_eq!(decoder.decode(&input), Ok(Value::Bin(vec![0, 0, 0, 1])));
    }

    #[test]
    fn test_de_timestamp() {
        // fixext 4: whole seconds only
        assert_eq!(
            from_slice(&[0xd6, 0xff, 0, 0, 0, 1]),
            Ok(Value::Timestamp(Timestamp::new(1, 0)))
        );
        // fixext 8: packed nanoseconds and seconds
        let word = (500_000_000u64 << 34) | 3;
        let mut input = vec![0xd7, 0xff];
        input.extend_from_slice(&word.to_be_bytes());
        assert_eq!(
            from_slice(&input),
            Ok(Value::Timestamp(Timestamp::new(3, 500_000_000)))
        );
        // ext 8 with a 12 byte payload: pre-epoch
        let mut input = vec![0xc7, 12, 0xff];
        input.extend_from_slice(&0u32.to_be_bytes());
        input.extend_from_slice(&(-1i64).to_be_bytes());
        assert_eq!(
            from_slice(&input),
            Ok(Value::Timestamp(Timestamp::new(-1, 0)))
        );
        // any other payload length is malformed
        assert_eq!(
            from_slice(&[0xd5, 0xff, 0, 0]),
            Err(DecodeError::MalformedTimestamp(2))
        );
    }

    #[test]
    fn test_de_trailing_bytes_ignored() {
        assert_eq!(from_slice(&[0x01, 0x02, 0x03]), Ok(Value::UInt(1)));
        assert_eq!(
            from_slice(&[0x91, 0xc3, 0xc2]),
            Ok(Value::Array(vec![Value::Bool(true)]))
        );
    }
}
