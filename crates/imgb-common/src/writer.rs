//! Endian-aware binary writer.

use std::io::Write;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::{Endian, Result};

/// Writes primitives to any [`Write`] sink in a chosen byte order.
///
/// # Example
///
/// ```
/// use imgb_common::{BinaryWriter, Endian};
///
/// let mut writer = BinaryWriter::new(Vec::new());
/// writer.write_u32_endian(0x100, Endian::Big).unwrap();
/// assert_eq!(writer.into_inner(), vec![0x00, 0x00, 0x01, 0x00]);
/// ```
#[derive(Debug)]
pub struct BinaryWriter<W> {
    inner: W,
}

impl<W: Write> BinaryWriter<W> {
    /// Wrap a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Get a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Write a u16 in the given byte order.
    pub fn write_u16_endian(&mut self, value: u16, endian: Endian) -> Result<()> {
        match endian {
            Endian::Little => self.inner.write_u16::<LittleEndian>(value)?,
            Endian::Big => self.inner.write_u16::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write a u32 in the given byte order.
    pub fn write_u32_endian(&mut self, value: u32, endian: Endian) -> Result<()> {
        match endian {
            Endian::Little => self.inner.write_u32::<LittleEndian>(value)?,
            Endian::Big => self.inner.write_u32::<BigEndian>(value)?,
        }
        Ok(())
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Write `count` zero bytes.
    pub fn write_zeros(&mut self, count: usize) -> Result<()> {
        self.inner.write_all(&vec![0u8; count])?;
        Ok(())
    }

    /// Write a string as exactly `length` bytes.
    ///
    /// The UTF-8 bytes are truncated or NUL-padded to `length`, then
    /// optionally reversed.
    pub fn write_fixed_string(&mut self, text: &str, length: usize, reverse: bool) -> Result<()> {
        let mut bytes = text.as_bytes().to_vec();
        bytes.resize(length, 0);
        if reverse {
            bytes.reverse();
        }
        self.write_bytes(&bytes)
    }
}
