//! Little-endian reader with bounded operations.

use crate::error::{ByteError, ByteResult};

/// A cursor over little-endian binary data.
///
/// Sequential reads advance the cursor; the `*_at` accessors read at an
/// absolute offset without moving it. All operations are bounds-checked and
/// return errors on failure. The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Creates a reader positioned at `offset`.
    pub fn at(data: &'a [u8], offset: usize) -> ByteResult<Self> {
        let mut reader = Self::new(data);
        reader.seek(offset)?;
        Ok(reader)
    }

    /// Returns the number of bytes remaining after the cursor.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current cursor position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the underlying buffer.
    #[must_use]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Moves the cursor to an absolute offset.
    ///
    /// Seeking to exactly the end of the buffer is allowed.
    pub fn seek(&mut self, offset: usize) -> ByteResult<()> {
        if offset > self.data.len() {
            return Err(ByteError::OffsetOutOfBounds {
                offset,
                len: 0,
                buffer_len: self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Reads a `u8`.
    pub fn read_u8(&mut self) -> ByteResult<u8> {
        let [value] = self.read_array::<1>()?;
        Ok(value)
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> ByteResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `i16`.
    pub fn read_i16(&mut self) -> ByteResult<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> ByteResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Reads `N` bytes into a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Borrows the next `len` bytes and advances past them.
    pub fn read_slice(&mut self, len: usize) -> ByteResult<&'a [u8]> {
        self.ensure(len)?;
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Reads a `u8` at an absolute offset.
    pub fn u8_at(&self, offset: usize) -> ByteResult<u8> {
        let [value] = self.array_at::<1>(offset)?;
        Ok(value)
    }

    /// Reads a little-endian `u16` at an absolute offset.
    pub fn u16_at(&self, offset: usize) -> ByteResult<u16> {
        Ok(u16::from_le_bytes(self.array_at(offset)?))
    }

    /// Reads a little-endian `i16` at an absolute offset.
    pub fn i16_at(&self, offset: usize) -> ByteResult<i16> {
        Ok(i16::from_le_bytes(self.array_at(offset)?))
    }

    /// Reads a little-endian `u32` at an absolute offset.
    pub fn u32_at(&self, offset: usize) -> ByteResult<u32> {
        Ok(u32::from_le_bytes(self.array_at(offset)?))
    }

    /// Borrows `len` bytes at an absolute offset.
    pub fn slice_at(&self, offset: usize, len: usize) -> ByteResult<&'a [u8]> {
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(ByteError::OffsetOutOfBounds {
                offset,
                len,
                buffer_len: self.data.len(),
            })?;
        Ok(&self.data[offset..end])
    }

    fn array_at<const N: usize>(&self, offset: usize) -> ByteResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice_at(offset, N)?);
        Ok(out)
    }

    fn ensure(&self, bytes: usize) -> ByteResult<()> {
        let available = self.remaining();
        if bytes > available {
            return Err(ByteError::UnexpectedEof {
                requested: bytes,
                available,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reader() {
        let reader = ByteReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_from_empty_fails() {
        let mut reader = ByteReader::new(&[]);
        let result = reader.read_u8();
        assert!(matches!(result, Err(ByteError::UnexpectedEof { .. })));
    }

    #[test]
    fn read_u32_little_endian() {
        let mut reader = ByteReader::new(&[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert!(reader.is_empty());
    }

    #[test]
    fn read_i16_negative() {
        let mut reader = ByteReader::new(&[0xFE, 0xFF]);
        assert_eq!(reader.read_i16().unwrap(), -2);
    }

    #[test]
    fn partial_read_does_not_advance() {
        let mut reader = ByteReader::new(&[0x01, 0x02, 0x03]);
        let err = reader.read_u32().unwrap_err();
        assert_eq!(
            err,
            ByteError::UnexpectedEof {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u16().unwrap(), 0x0201);
    }

    #[test]
    fn seek_to_end_allowed_past_end_rejected() {
        let data = [0u8; 4];
        let mut reader = ByteReader::new(&data);
        reader.seek(4).unwrap();
        assert!(reader.is_empty());
        assert!(matches!(
            reader.seek(5),
            Err(ByteError::OffsetOutOfBounds { offset: 5, .. })
        ));
    }

    #[test]
    fn absolute_reads_leave_cursor() {
        let data = [0x01, 0x00, 0xFF, 0xFF];
        let reader = ByteReader::new(&data);
        assert_eq!(reader.u16_at(0).unwrap(), 1);
        assert_eq!(reader.i16_at(2).unwrap(), -1);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn slice_at_overflow_is_error() {
        let data = [0u8; 8];
        let reader = ByteReader::new(&data);
        assert!(reader.slice_at(usize::MAX, 2).is_err());
        assert!(reader.slice_at(6, 4).is_err());
        assert_eq!(reader.slice_at(6, 2).unwrap().len(), 2);
    }

    #[test]
    fn read_slice_advances() {
        let data = [1, 2, 3, 4, 5];
        let mut reader = ByteReader::at(&data, 1).unwrap();
        assert_eq!(reader.read_slice(3).unwrap(), &[2, 3, 4]);
        assert_eq!(reader.position(), 4);
        assert!(reader.read_slice(2).is_err());
    }
}
