//! Bounds-carrying views over caller-owned font bytes

use std::ops::Range;

use crate::endian::{be_i16, be_i32, be_u16, be_u32};
use crate::error::DecodeError;

// -----------------------------------------------------------------------------
// TableData
//
// A read-only window over the bytes of one table. Random-access reads check
// their bounds and return `DecodeError::Malformed` instead of over-reading.
// Sequential reads go through `cursor`, which hands out a plain `&[u8]` that
// implements `bytes::Buf`.
// -----------------------------------------------------------------------------
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TableData<'a> {
    bytes: &'a [u8],
}

impl<'a> TableData<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        TableData { bytes }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline(always)]
    fn read_n_bytes<const N: usize>(&self, offset: usize) -> Result<[u8; N], DecodeError> {
        let end = offset.checked_add(N).ok_or(DecodeError::Malformed)?;
        let slice = self.bytes.get(offset..end).ok_or(DecodeError::Malformed)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(slice);
        Ok(bytes)
    }

    #[inline]
    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.bytes.get(offset).copied().ok_or(DecodeError::Malformed)
    }

    #[inline]
    pub fn read_i8(&self, offset: usize) -> Result<i8, DecodeError> {
        Ok(self.read_u8(offset)? as i8)
    }

    #[inline]
    pub fn read_u16(&self, offset: usize) -> Result<u16, DecodeError> {
        self.read_n_bytes::<2>(offset).map(be_u16)
    }

    #[inline]
    pub fn read_i16(&self, offset: usize) -> Result<i16, DecodeError> {
        self.read_n_bytes::<2>(offset).map(be_i16)
    }

    #[inline]
    pub fn read_u32(&self, offset: usize) -> Result<u32, DecodeError> {
        self.read_n_bytes::<4>(offset).map(be_u32)
    }

    #[inline]
    pub fn read_i32(&self, offset: usize) -> Result<i32, DecodeError> {
        self.read_n_bytes::<4>(offset).map(be_i32)
    }

    /// Read a 64-bit big-endian value as its (high, low) 32-bit halves.
    pub fn read_u64_halves(&self, offset: usize) -> Result<(u32, u32), DecodeError> {
        Ok((self.read_u32(offset)?, self.read_u32(offset + 4)?))
    }

    /// A sub-view over `range`.
    pub fn slice(&self, range: Range<usize>) -> Result<TableData<'a>, DecodeError> {
        self.bytes
            .get(range)
            .map(TableData::new)
            .ok_or(DecodeError::Malformed)
    }

    /// Everything from `offset` to the end of the table.
    pub fn split_off(&self, offset: usize) -> Result<TableData<'a>, DecodeError> {
        self.slice(offset..self.len())
    }

    /// A `bytes::Buf` positioned at `offset`.
    pub fn cursor(&self, offset: usize) -> Result<&'a [u8], DecodeError> {
        self.bytes.get(offset..).ok_or(DecodeError::Malformed)
    }

    /// The byte range `len` items of `item_size` bytes would occupy at `offset`, checked against
    /// the end of the table.
    pub fn check_array(
        &self,
        offset: usize,
        len: usize,
        item_size: usize,
    ) -> Result<Range<usize>, DecodeError> {
        let size = len.checked_mul(item_size).ok_or(DecodeError::Malformed)?;
        let end = offset.checked_add(size).ok_or(DecodeError::Malformed)?;
        if end > self.len() {
            return Err(DecodeError::Malformed);
        }
        Ok(offset..end)
    }
}

impl<'a> From<&'a [u8]> for TableData<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        TableData::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_big_endian_and_checked() {
        let data = TableData::new(&[0x00, 0x01, 0xff, 0xfe, 0x12, 0x34, 0x56, 0x78]);
        assert_eq!(data.read_u16(0), Ok(1));
        assert_eq!(data.read_i16(2), Ok(-2));
        assert_eq!(data.read_u32(4), Ok(0x1234_5678));
        assert_eq!(data.read_u8(7), Ok(0x78));
        assert_eq!(data.read_u16(7), Err(DecodeError::Malformed));
        assert_eq!(data.read_u32(usize::MAX - 1), Err(DecodeError::Malformed));
        assert_eq!(data.read_u8(8), Err(DecodeError::Malformed));
    }

    #[test]
    fn sub_views() {
        let data = TableData::new(&[1, 2, 3, 4, 5]);
        assert_eq!(data.slice(1..3).unwrap().as_bytes(), &[2, 3]);
        assert_eq!(data.split_off(4).unwrap().as_bytes(), &[5]);
        assert!(data.split_off(5).unwrap().is_empty());
        assert!(data.slice(3..6).is_err());
        assert_eq!(data.check_array(1, 2, 2), Ok(1..5));
        assert!(data.check_array(1, 3, 2).is_err());
        assert!(data.check_array(0, usize::MAX, 2).is_err());
    }
}
