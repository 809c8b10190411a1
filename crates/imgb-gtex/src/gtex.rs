//! GTEX chunk location and parsing.

use imgb_common::memchr::memmem;
use imgb_common::BinaryReader;
use zerocopy::byteorder::big_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::format::{validate_codes, PixelFormat, Topology};
use crate::{Error, Result};

/// Tag that opens the GTEX chunk.
pub const GTEX_MAGIC: &[u8; 4] = b"GTEX";

/// Offset of the little-endian total-size field in a header block.
pub const HEADER_BLOCK_SIZE_OFFSET: usize = 16;

/// On-disk GTEX record, starting at the tag. All fields are big-endian.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct GtexRecord {
    pub magic: [u8; 4],
    pub version: u8,
    pub flag_a: u8,
    pub format: u8,
    pub mip_count: u8,
    pub flag_b: u8,
    pub topology: u8,
    pub width: U16,
    pub height: U16,
    pub depth: U16,
    /// Mip table position relative to the tag.
    pub mip_table_offset: U32,
}

/// Find the first `GTEX` tag in a header block, at any byte offset.
pub fn find_gtex(header_block: &[u8]) -> Option<usize> {
    memmem::find(header_block, GTEX_MAGIC)
}

/// Decoded GTEX record plus the position it was found at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GtexHeader {
    /// Offset of the tag within the header block.
    pub offset: usize,
    pub version: u8,
    pub flag_a: u8,
    /// Raw pixel format code.
    pub format: u8,
    pub mip_count: u8,
    pub flag_b: u8,
    /// Raw texture type code.
    pub topology: u8,
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    pub mip_table_offset: u32,
}

impl GtexHeader {
    /// Locate and decode the GTEX record in a header block.
    pub fn locate(header_block: &[u8]) -> Result<Self> {
        let offset = find_gtex(header_block).ok_or(Error::GtexNotFound)?;
        Self::parse_at(header_block, offset)
    }

    /// Decode the record whose tag starts at `offset`.
    pub fn parse_at(header_block: &[u8], offset: usize) -> Result<Self> {
        let mut reader = BinaryReader::new_at(header_block, offset);
        let record: GtexRecord = reader.read_struct()?;

        Ok(Self {
            offset,
            version: record.version,
            flag_a: record.flag_a,
            format: record.format,
            mip_count: record.mip_count,
            flag_b: record.flag_b,
            topology: record.topology,
            width: record.width.get(),
            height: record.height.get(),
            depth: record.depth.get(),
            mip_table_offset: record.mip_table_offset.get(),
        })
    }

    /// Check the format and type codes and the mip count.
    pub fn validate(&self) -> Result<(PixelFormat, Topology)> {
        let codes = validate_codes(self.format, self.topology)?;
        if self.mip_count == 0 {
            return Err(Error::EmptyMipChain);
        }
        Ok(codes)
    }

    /// Absolute position of the mip table within the header block.
    pub fn mip_table_position(&self) -> usize {
        self.offset + self.mip_table_offset as usize
    }

    /// Encode this header back into the header block at its offset.
    ///
    /// The tag itself is rewritten unchanged.
    pub fn write_into(&self, header_block: &mut [u8]) -> Result<()> {
        let record = GtexRecord {
            magic: *GTEX_MAGIC,
            version: self.version,
            flag_a: self.flag_a,
            format: self.format,
            mip_count: self.mip_count,
            flag_b: self.flag_b,
            topology: self.topology,
            width: U16::new(self.width),
            height: U16::new(self.height),
            depth: U16::new(self.depth),
            mip_table_offset: U32::new(self.mip_table_offset),
        };
        let bytes = record.as_bytes();
        let end = self.offset + bytes.len();
        let available = header_block.len().saturating_sub(self.offset);
        let target = header_block
            .get_mut(self.offset..end)
            .ok_or(imgb_common::Error::UnexpectedEof {
                needed: bytes.len(),
                available,
            })?;
        target.copy_from_slice(bytes);
        Ok(())
    }
}
