use alloc::vec::Vec;

/// A growable output buffer with a write cursor.
///
/// All write methods grow the underlying region as needed and never fail.
/// When the region overflows it is reallocated to at least twice its
/// previous capacity, so repeated writes stay amortized constant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBuf {
    buf: Vec<u8>,
}

impl WriteBuf {
    /// Create an empty buffer without allocating.
    pub fn new() -> Self {
        WriteBuf { buf: Vec::new() }
    }

    /// Create an empty buffer backed by a region of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        WriteBuf { buf: Vec::with_capacity(capacity) }
    }

    /// Make room for at least `additional` more bytes.
    ///
    /// Grows to `max(2 × capacity, len + additional)` so a run of small
    /// writes does not reallocate for every one of them.
    pub fn reserve(&mut self, additional: usize) {
        let required = self.buf.len() + additional;
        if required > self.buf.capacity() {
            let target = required.max(self.buf.capacity() * 2);
            self.buf.reserve_exact(target - self.buf.len());
        }
    }

    /// Replace the backing region with a fresh one of `capacity` bytes,
    /// dropping any written content.
    ///
    /// Lets a caller release memory between independent encodes.
    pub fn resize(&mut self, capacity: usize) {
        self.buf = Vec::with_capacity(capacity);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current capacity of the backing region.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Rewind the write cursor, keeping the backing region.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// The written range as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the buffer and return the written bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    pub fn push_slice(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.buf.extend_from_slice(bytes);
    }

    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.push_slice(s.as_bytes());
    }

    #[inline]
    pub fn push_u8(&mut self, v: u8) {
        self.reserve(1);
        self.buf.push(v);
    }

    #[inline]
    pub fn push_i8(&mut self, v: i8) {
        self.push_u8(v as u8);
    }

    #[inline]
    pub fn push_u16(&mut self, v: u16) {
        self.push_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn push_i16(&mut self, v: i16) {
        self.push_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn push_u32(&mut self, v: u32) {
        self.push_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn push_i32(&mut self, v: i32) {
        self.push_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn push_u64(&mut self, v: u64) {
        self.push_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn push_i64(&mut self, v: i64) {
        self.push_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn push_f32(&mut self, v: f32) {
        self.push_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn push_f64(&mut self, v: f64) {
        self.push_slice(&v.to_be_bytes());
    }
}

impl AsRef<[u8]> for WriteBuf {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<WriteBuf> for Vec<u8> {
    fn from(buf: WriteBuf) -> Self {
        buf.into_vec()
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl std::io::Write for WriteBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.push_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
