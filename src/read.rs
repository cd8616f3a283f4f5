use crate::{ReadError, ReadResult};

/// A read cursor over an immutable byte slice.
///
/// Every fetch advances the cursor by the width it read. The cursor
/// position can be saved with [`Reader::pos`] and restored with
/// [`Reader::seek`], which is what a decoder needs to re-read a region
/// under a different strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Reader { input, pos: 0 }
    }

    /// Current cursor offset from the start of the input.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor to an absolute offset.
    #[inline]
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.input.len().saturating_sub(self.pos)
    }

    /// Return the next byte without advancing.
    #[inline]
    pub fn peek(&self) -> ReadResult<u8> {
        self.input.get(self.pos).copied().ok_or(ReadError::UnexpectedEof)
    }

    /// Fetch the next byte.
    #[inline]
    pub fn fetch(&mut self) -> ReadResult<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Ok(c)
    }

    /// Fetch `len` raw bytes with the lifetime of the input slice.
    pub fn fetch_slice(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(ReadError::UnexpectedEof)?;
        let res = self.input.get(self.pos..end).ok_or(ReadError::UnexpectedEof)?;
        self.pos = end;
        Ok(res)
    }

    fn fetch_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        Ok(self.fetch_slice(N)?.try_into().expect("slice length checked"))
    }

    pub fn fetch_u8(&mut self) -> ReadResult<u8> {
        self.fetch()
    }

    pub fn fetch_i8(&mut self) -> ReadResult<i8> {
        Ok(self.fetch()? as i8)
    }

    pub fn fetch_u16(&mut self) -> ReadResult<u16> {
        Ok(u16::from_be_bytes(self.fetch_array()?))
    }

    pub fn fetch_i16(&mut self) -> ReadResult<i16> {
        Ok(i16::from_be_bytes(self.fetch_array()?))
    }

    pub fn fetch_u32(&mut self) -> ReadResult<u32> {
        Ok(u32::from_be_bytes(self.fetch_array()?))
    }

    pub fn fetch_i32(&mut self) -> ReadResult<i32> {
        Ok(i32::from_be_bytes(self.fetch_array()?))
    }

    pub fn fetch_u64(&mut self) -> ReadResult<u64> {
        Ok(u64::from_be_bytes(self.fetch_array()?))
    }

    pub fn fetch_i64(&mut self) -> ReadResult<i64> {
        Ok(i64::from_be_bytes(self.fetch_array()?))
    }

    pub fn fetch_f32(&mut self) -> ReadResult<f32> {
        Ok(f32::from_be_bytes(self.fetch_array()?))
    }

    pub fn fetch_f64(&mut self) -> ReadResult<f64> {
        Ok(f64::from_be_bytes(self.fetch_array()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader() {
        let input = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut rd = Reader::new(&input);
        assert_eq!(rd.peek(), Ok(0x01));
        assert_eq!(rd.fetch(), Ok(0x01));
        assert_eq!(rd.fetch_u16(), Ok(0x0203));
        assert_eq!(rd.pos(), 3);
        assert_eq!(rd.remaining(), 2);
        assert_eq!(rd.fetch_u32(), Err(ReadError::UnexpectedEof));
        assert_eq!(rd.fetch_slice(2), Ok(&[0x04, 0x05][..]));
        assert_eq!(rd.fetch(), Err(ReadError::UnexpectedEof));
        rd.seek(0);
        assert_eq!(rd.fetch_i8(), Ok(1));
    }

    #[test]
    fn test_reader_fixed_widths() {
        let mut input = alloc::vec::Vec::new();
        input.extend_from_slice(&0x8000u16.to_be_bytes());
        input.extend_from_slice(&(-5i32).to_be_bytes());
        input.extend_from_slice(&u64::MAX.to_be_bytes());
        input.extend_from_slice(&(-9i64).to_be_bytes());
        input.extend_from_slice(&2.5f32.to_be_bytes());
        input.extend_from_slice(&(-0.25f64).to_be_bytes());
        let mut rd = Reader::new(&input);
        assert_eq!(rd.fetch_u16(), Ok(0x8000));
        assert_eq!(rd.fetch_i32(), Ok(-5));
        assert_eq!(rd.fetch_u64(), Ok(u64::MAX));
        assert_eq!(rd.fetch_i64(), Ok(-9));
        assert_eq!(rd.fetch_f32(), Ok(2.5));
        assert_eq!(rd.fetch_f64(), Ok(-0.25));
        assert_eq!(rd.remaining(), 0);
    }

    #[test]
    fn test_reader_rewind() {
        let input = [0xde, 0xad, 0xbe, 0xef];
        let mut rd = Reader::new(&input);
        rd.fetch_u16().unwrap();
        let mark = rd.pos();
        assert_eq!(rd.fetch_u16(), Ok(0xbeef));
        rd.seek(mark);
        assert_eq!(rd.fetch_u16(), Ok(0xbeef));
    }
}
