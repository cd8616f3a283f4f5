//! Byte buffer primitives for binary codecs.
//!
//! [`WriteBuf`] owns a growable byte region with a write cursor, doubling
//! its capacity on overflow. [`Reader`] wraps an immutable byte slice with
//! a read cursor and fixed-width big-endian read primitives.
//!
//! Both are transient by design: a codec creates one per top-level call,
//! or keeps a [`WriteBuf`] around and [`WriteBuf::clear`]s it between calls
//! to reuse its allocation.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

use core::fmt;

mod read;
mod write;

pub use read::Reader;
pub use write::WriteBuf;

pub type ReadResult<T> = Result<T, ReadError>;

/// An error returned by [`Reader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ReadError {
    /// Read past the end of the input slice
    UnexpectedEof,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::UnexpectedEof => f.write_str("unexpected end of input"),
        }
    }
}

impl core::error::Error for ReadError {}
