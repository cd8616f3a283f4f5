//! A MessagePack codec for dynamically typed [`Value`] trees, built on the [`bin-buf`](`bin_buf`) primitives.
/*!

[`Encoder`] always picks the smallest wire representation capable of
holding a value:

| [`Value`] variant | MessagePack type
|-------------------|--------------------
| `Nil`             | `nil`
| `Bool`            | `bool`
| `Int`, `UInt`     | `fixint`, `int 8-64`, `uint 8-64` (smallest repr.)
| `Float`           | `float 64`
| `Str`             | `fixstr`, `str 8/16/32` (smallest repr.)
| `Bin`             | `bin 8/16/32` (smallest repr.)
| `Array`           | `fixarray`, `array 16/32` (smallest repr.)
| `Object`, `Map`   | `fixmap`, `map 16/32` (smallest repr.)
| `Ext`             | `fixext 1/2/4/8/16`, `ext 8/16/32` (smallest repr.)
| `Timestamp`       | `fixext 8` or `ext 8` with type `-1`

[`Decoder`] reconstructs values by dispatching on the leading tag byte:

| MessagePack type -> | [`Value`] variant (depending on [`DecodeOptions`])
|---------------------|----------------------------------------------------
| `nil`               | `Nil`
| `0xc1` (reserved)   | the configured absent substitute (`Nil` by default)
| `bool`              | `Bool`
| `fixint`, `uint`    | `UInt`
| negative `int`      | `Int`
| `float 32/64`       | `Float` (widened to 64 bits)
| `str`               | `Str`, or `Bin` when the bytes are not UTF-8
| `bin`               | `Bin`
| `array`             | `Array`
| `map`               | `Object` or `Map` (see [`MapMode`])
| `ext`, `fixext`     | registered codec result, else `Timestamp` for type `-1`, else opaque `Ext`

Maps are decoded in two phases by default: optimistically into a
string-keyed [`Value::Object`], falling back once per map to the
arbitrary-key [`Value::Map`] when a composite key turns up. See
[`MapMode`] for the two strict alternatives.

Custom extension types are installed with [`Extensions::register`], which
takes a matcher closure together with both conversion directions.
*/
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod de;
pub mod ext;
pub mod ser;
pub mod timestamp;
pub mod value;

pub use bin_buf;

pub use de::{from_slice, DecodeError, DecodeOptions, Decoder, ExtPolicy, MapMode, Utf8Policy};
pub use ext::{ExtCodec, Extensions};
pub use ser::{to_vec, EncodeError, Encoder};
pub use timestamp::{Timestamp, EXT_TIMESTAMP};
pub use value::{Ext, Value};

mod marker {
    /* MessagePack MAGICK */
    pub const MIN_POSFIXINT: u8 = 0x00;
    pub const MAX_POSFIXINT: u8 = 0x7f;
    pub const NEGFIXINT: u8 = 0b11100000;
    pub const MIN_NEGFIXINT: i8 = NEGFIXINT as i8; //-32
    pub const NIL: u8      = 0xc0;
    pub const RESERVED: u8 = 0xc1;
    pub const FALSE: u8    = 0xc2;
    pub const TRUE: u8     = 0xc3;

    pub const FIXMAP: u8   = 0x80; /* 1000xxxx */
    pub const MAX_FIXMAP_SIZE: usize = 0b1111;
    pub const FIXMAP_MAX: u8 = FIXMAP + MAX_FIXMAP_SIZE as u8; /* 10001111 */

    pub const FIXARRAY: u8 = 0x90; /* 1001xxxx */
    pub const MAX_FIXARRAY_SIZE: usize = 0b1111;
    pub const FIXARRAY_MAX: u8 = FIXARRAY + MAX_FIXARRAY_SIZE as u8; /* 10011111 */

    pub const FIXSTR: u8   = 0xa0; /* 101xxxxx */
    pub const MAX_FIXSTR_SIZE: usize = 0b11111;
    pub const FIXSTR_MAX: u8 = FIXSTR + MAX_FIXSTR_SIZE as u8; /* 10111111 */

    pub const BIN_8: u8     = 0xc4;
    pub const BIN_16: u8    = 0xc5;
    pub const BIN_32: u8    = 0xc6;

    pub const EXT_8: u8     = 0xc7;
    pub const EXT_16: u8    = 0xc8;
    pub const EXT_32: u8    = 0xc9;

    pub const FLOAT_32: u8  = 0xca;
    pub const FLOAT_64: u8  = 0xcb;

    pub const UINT_8: u8    = 0xcc;
    pub const UINT_16: u8   = 0xcd;
    pub const UINT_32: u8   = 0xce;
    pub const UINT_64: u8   = 0xcf;

    pub const INT_8: u8     = 0xd0;
    pub const INT_16: u8    = 0xd1;
    pub const INT_32: u8    = 0xd2;
    pub const INT_64: u8    = 0xd3;

    pub const FIXEXT_1: u8  = 0xd4;
    pub const FIXEXT_2: u8  = 0xd5;
    pub const FIXEXT_4: u8  = 0xd6;
    pub const FIXEXT_8: u8  = 0xd7;
    pub const FIXEXT_16: u8 = 0xd8;

    pub const STR_8: u8     = 0xd9;
    pub const STR_16: u8    = 0xda;
    pub const STR_32: u8    = 0xdb;

    pub const ARRAY_16: u8  = 0xdc;
    pub const ARRAY_32: u8  = 0xdd;

    pub const MAP_16: u8    = 0xde;
    pub const MAP_32: u8    = 0xdf;
}
