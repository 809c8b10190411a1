//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! little- or big-endian data from a byte slice without copying.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use zerocopy::FromBytes;

use crate::{Endian, Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// # Example
///
/// ```
/// use imgb_common::{BinaryReader, Endian};
///
/// let data = [0x00, 0x00, 0x01, 0x00, 0x00, 0x01];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32_endian(Endian::Big).unwrap(), 0x100);
/// assert_eq!(reader.read_u16_endian(Endian::Little).unwrap(), 0x100);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a new reader starting at a specific position.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a u16 in the given byte order.
    #[inline]
    pub fn read_u16_endian(&mut self, endian: Endian) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(match endian {
            Endian::Little => LittleEndian::read_u16(bytes),
            Endian::Big => BigEndian::read_u16(bytes),
        })
    }

    /// Read a u32 in the given byte order.
    #[inline]
    pub fn read_u32_endian(&mut self, endian: Endian) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(match endian {
            Endian::Little => LittleEndian::read_u32(bytes),
            Endian::Big => BigEndian::read_u32(bytes),
        })
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_u32_endian(Endian::Little)
    }

    /// Read a big-endian u32.
    #[inline]
    pub fn read_u32_be(&mut self) -> Result<u32> {
        self.read_u32_endian(Endian::Big)
    }

    /// Read a fixed-length string.
    ///
    /// The bytes are optionally reversed before decoding, then decoded as
    /// UTF-8 with every NUL byte removed.
    pub fn read_fixed_string(&mut self, length: usize, reverse: bool) -> Result<String> {
        let mut bytes = self.read_bytes(length)?.to_vec();
        if reverse {
            bytes.reverse();
        }
        bytes.retain(|&b| b != 0);
        let text = std::str::from_utf8(&bytes).map_err(Error::Utf8)?;
        Ok(text.to_owned())
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_both_endians() {
        let data = [
            0x01u8, 0x02, 0x03, 0x04, // u32
            0x01, 0x02, 0x03, 0x04, // u32
            0xAB, 0xCD, // u16
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.read_u32_be().unwrap(), 0x01020304);
        assert_eq!(reader.read_u16_endian(Endian::Big).unwrap(), 0xABCD);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_fixed_string_strips_nul() {
        let data = b"DXT1\0\0\0\0";
        let mut reader = BinaryReader::new(data);

        assert_eq!(reader.read_fixed_string(4, false).unwrap(), "DXT1");
        assert_eq!(reader.read_fixed_string(4, false).unwrap(), "");
    }

    #[test]
    fn test_read_fixed_string_reversed() {
        let data = b"XETG";
        let mut reader = BinaryReader::new(data);

        assert_eq!(reader.read_fixed_string(4, true).unwrap(), "GTEX");
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_seek_and_peek() {
        let data = [0x10, 0x20, 0x30, 0x40, 0x50];
        let mut reader = BinaryReader::new_at(&data, 3);

        assert_eq!(reader.remaining(), 2);
        assert_eq!(reader.peek_bytes(2).unwrap(), &[0x40, 0x50]);
        assert_eq!(reader.position(), 3);

        reader.seek(0);
        assert_eq!(reader.read_u16_endian(Endian::Big).unwrap(), 0x1020);
        assert_eq!(reader.read_u16_endian(Endian::Little).unwrap(), 0x4030);
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        assert!(matches!(
            reader.read_u32_be(),
            Err(Error::UnexpectedEof {
                needed: 4,
                available: 2
            })
        ));
    }
}
