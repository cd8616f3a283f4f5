//! Registry for user-defined extension types.
//!
//! A codec is registered under a signed type tag together with a matcher
//! closure deciding which values it claims on encode. Decoding looks the
//! codec up by tag. One [`Extensions::register`] call installs both
//! directions; the same registry can back an [`Encoder`](crate::Encoder)
//! and a [`Decoder`](crate::Decoder) at once.

use alloc::sync::Arc;
use alloc::vec::Vec;

use core::fmt;

use crate::de::DecodeError;
use crate::ser::EncodeError;
use crate::value::Value;

type Matcher = dyn Fn(&Value) -> bool + Send + Sync;
type EncodeFn = dyn Fn(&Value) -> Result<Vec<u8>, EncodeError> + Send + Sync;
type DecodeFn = dyn Fn(&[u8]) -> Result<Value, DecodeError> + Send + Sync;

/// A registered extension codec: a type tag, a matcher and both
/// conversion directions.
#[derive(Clone)]
pub struct ExtCodec {
    tag: i8,
    matcher: Arc<Matcher>,
    encode: Arc<EncodeFn>,
    decode: Arc<DecodeFn>,
}

impl ExtCodec {
    pub fn tag(&self) -> i8 {
        self.tag
    }

    /// Whether this codec claims `value` on encode.
    pub fn matches(&self, value: &Value) -> bool {
        (self.matcher)(value)
    }

    /// Produce the extension payload for a matched value.
    ///
    /// An error aborts the entire top-level encode.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        (self.encode)(value)
    }

    /// Reconstruct a value from an extension payload.
    ///
    /// An error aborts the entire top-level decode.
    pub fn decode(&self, data: &[u8]) -> Result<Value, DecodeError> {
        (self.decode)(data)
    }
}

impl fmt::Debug for ExtCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtCodec").field("tag", &self.tag).finish_non_exhaustive()
    }
}

/// An ordered collection of [`ExtCodec`]s.
///
/// Encode-side matchers are consulted in registration order; the first
/// match wins. Tags are unique: registering an already present tag
/// replaces the previous codec.
#[derive(Debug, Clone, Default)]
pub struct Extensions {
    codecs: Vec<ExtCodec>,
}

impl Extensions {
    pub fn new() -> Self {
        Extensions::default()
    }

    /// Install a codec for extension type `tag`.
    ///
    /// Negative tags are reserved by the MessagePack specification but
    /// accepted; registering type `-1` overrides the built-in timestamp
    /// codec on decode.
    pub fn register<M, E, D>(&mut self, tag: i8, matcher: M, encode: E, decode: D)
        where M: Fn(&Value) -> bool + Send + Sync + 'static,
              E: Fn(&Value) -> Result<Vec<u8>, EncodeError> + Send + Sync + 'static,
              D: Fn(&[u8]) -> Result<Value, DecodeError> + Send + Sync + 'static,
    {
        let codec = ExtCodec {
            tag,
            matcher: Arc::new(matcher),
            encode: Arc::new(encode),
            decode: Arc::new(decode),
        };
        match self.codecs.iter_mut().find(|c| c.tag == tag) {
            Some(slot) => *slot = codec,
            None => self.codecs.push(codec),
        }
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// The first codec whose matcher claims `value`.
    pub fn match_value(&self, value: &Value) -> Option<&ExtCodec> {
        self.codecs.iter().find(|c| c.matches(value))
    }

    /// The codec registered for `tag`.
    pub fn by_tag(&self, tag: i8) -> Option<&ExtCodec> {
        self.codecs.iter().find(|c| c.tag == tag)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use super::*;

    fn sample() -> Extensions {
        let mut exts = Extensions::new();
        exts.register(
            7,
            |value| matches!(value, Value::Bool(_)),
            |value| Ok(vec![value.as_bool().unwrap() as u8]),
            |data| Ok(Value::Bool(data == [1])),
        );
        exts
    }

    #[test]
    fn test_lookup() {
        let exts = sample();
        assert_eq!(exts.len(), 1);
        assert!(exts.by_tag(7).is_some());
        assert!(exts.by_tag(8).is_none());
        assert_eq!(exts.match_value(&Value::Bool(true)).map(ExtCodec::tag), Some(7));
        assert!(exts.match_value(&Value::Nil).is_none());
    }

    #[test]
    fn test_register_replaces_same_tag() {
        let mut exts = sample();
        exts.register(
            7,
            |value| value.is_nil(),
            |_| Ok(vec![]),
            |_| Ok(Value::Nil),
        );
        assert_eq!(exts.len(), 1);
        assert!(exts.match_value(&Value::Bool(true)).is_none());
        assert!(exts.match_value(&Value::Nil).is_some());
    }

    #[test]
    fn test_codec_round_trip() {
        let exts = sample();
        let codec = exts.by_tag(7).unwrap();
        let payload = codec.encode(&Value::Bool(true)).unwrap();
        assert_eq!(payload, [1]);
        assert_eq!(codec.decode(&payload), Ok(Value::Bool(true)));
    }
}
