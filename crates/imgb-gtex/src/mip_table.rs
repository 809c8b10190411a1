//! Mip offset table reading and writing.
//!
//! The table is a run of big-endian `(start, size)` pairs addressing the
//! data block. Cubemaps store all mips of face 0, then face 1, and so on.

use std::io::Write;
use std::ops::Range;

use imgb_common::{BinaryReader, BinaryWriter, Endian};

use crate::format::Topology;
use crate::gtex::{GtexHeader, HEADER_BLOCK_SIZE_OFFSET};
use crate::{Error, Result};

/// Destination mips are padded with zeros up to this many bytes.
pub const MIN_MIP_BYTES: usize = 16;

/// Size of one table slot.
pub const ENTRY_LEN: usize = 8;

/// One mip's location in the data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipEntry {
    pub start: u32,
    pub size: u32,
}

impl MipEntry {
    pub const fn new(start: u32, size: u32) -> Self {
        Self { start, size }
    }

    /// Byte range within the data block.
    pub fn range(&self) -> Range<usize> {
        let start = self.start as usize;
        start..start + self.size as usize
    }
}

/// Entries decoded from a header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipTable {
    entries: Vec<MipEntry>,
}

impl MipTable {
    /// Read the table for a header, sized by its topology.
    pub fn read(header_block: &[u8], header: &GtexHeader, topology: Topology) -> Result<Self> {
        let count = topology.entry_count(header.mip_count);
        Self::read_at(header_block, header.mip_table_position(), count)
    }

    /// Read `count` entries starting at an absolute position.
    pub fn read_at(header_block: &[u8], position: usize, count: usize) -> Result<Self> {
        let mut reader = BinaryReader::new_at(header_block, position);
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let start = reader.read_u32_be()?;
            let size = reader.read_u32_be()?;
            entries.push(MipEntry { start, size });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[MipEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split face-major entries into per-face groups of `mips_per_face`.
    pub fn faces(&self, mips_per_face: usize) -> std::slice::Chunks<'_, MipEntry> {
        self.entries.chunks(mips_per_face.max(1))
    }

    /// Fail on the first entry that does not fit in a data block of `len` bytes.
    pub fn check_bounds(&self, len: u64) -> Result<()> {
        for (index, entry) in self.entries.iter().enumerate() {
            let end = entry.start as u64 + entry.size as u64;
            if end > len {
                return Err(Error::MipOutOfRange {
                    index,
                    start: entry.start,
                    size: entry.size,
                    len,
                });
            }
        }
        Ok(())
    }
}

/// Grow the header block's table when more entries are needed than reserved.
///
/// Zeroed 8-byte slots are appended to the buffer and the little-endian
/// total-size field at offset 16 is set to the new length. Returns the
/// number of slots added.
pub fn reserve_slots(header_block: &mut Vec<u8>, reserved: usize, needed: usize) -> Result<usize> {
    if needed <= reserved {
        return Ok(0);
    }

    let extra = needed - reserved;
    header_block.resize(header_block.len() + extra * ENTRY_LEN, 0);

    let total = u32::try_from(header_block.len()).map_err(|_| Error::DataBlockTooLarge)?;
    let available = header_block.len();
    let field = header_block
        .get_mut(HEADER_BLOCK_SIZE_OFFSET..HEADER_BLOCK_SIZE_OFFSET + 4)
        .ok_or(imgb_common::Error::UnexpectedEof {
            needed: HEADER_BLOCK_SIZE_OFFSET + 4,
            available,
        })?;
    field.copy_from_slice(&total.to_le_bytes());

    Ok(extra)
}

/// Write entries into the header's table slots.
pub fn write_table(
    header_block: &mut [u8],
    header: &GtexHeader,
    entries: &[MipEntry],
) -> Result<()> {
    let position = header.mip_table_position();
    let end = position + entries.len() * ENTRY_LEN;
    let available = header_block.len().saturating_sub(position);
    let slots = header_block
        .get_mut(position..end)
        .ok_or(imgb_common::Error::UnexpectedEof {
            needed: entries.len() * ENTRY_LEN,
            available,
        })?;

    let mut writer = BinaryWriter::new(slots);
    for entry in entries {
        writer.write_u32_endian(entry.start, Endian::Big)?;
        writer.write_u32_endian(entry.size, Endian::Big)?;
    }
    Ok(())
}

/// Appends mips to a data block while recording where each one landed.
///
/// `cursor` tracks the data block's length; mips shorter than
/// [`MIN_MIP_BYTES`] are followed by zero padding.
#[derive(Debug)]
pub struct MipTableWriter<W: Write> {
    sink: BinaryWriter<W>,
    cursor: u64,
    entries: Vec<MipEntry>,
}

impl<W: Write> MipTableWriter<W> {
    /// Start appending at `cursor`, the current data block length.
    pub fn new(sink: W, cursor: u64) -> Self {
        Self {
            sink: BinaryWriter::new(sink),
            cursor,
            entries: Vec::new(),
        }
    }

    /// Current data block length.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Append one mip and record its entry.
    pub fn push_mip(&mut self, pixels: &[u8]) -> Result<MipEntry> {
        let start = u32::try_from(self.cursor).map_err(|_| Error::DataBlockTooLarge)?;
        let size = u32::try_from(pixels.len()).map_err(|_| Error::DataBlockTooLarge)?;
        let padding = MIN_MIP_BYTES.saturating_sub(pixels.len());

        self.sink.write_bytes(pixels)?;
        self.sink.write_zeros(padding)?;
        self.cursor += (pixels.len() + padding) as u64;

        let entry = MipEntry { start, size };
        self.entries.push(entry);
        Ok(entry)
    }

    /// Flush the sink and return the recorded entries.
    pub fn finish(mut self) -> Result<Vec<MipEntry>> {
        self.sink.get_mut().flush()?;
        Ok(self.entries)
    }
}
