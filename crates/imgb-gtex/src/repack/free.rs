//! Append-only repack that rebuilds the header from the replacement image.

use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::source::{split_mips, Source};
use crate::format::{mip_chain, MipLevel, PixelFormat, Topology};
use crate::gtex::GtexHeader;
use crate::mip_table::{reserve_slots, write_table, MipTableWriter, ENTRY_LEN, MIN_MIP_BYTES};
use crate::{settle, Error, Outcome, Result};

/// Repack a texture whose dimensions, format or topology may have changed.
///
/// The GTEX record and mip table are rebuilt from the replacement DDS
/// (found as `<container_name>.dds`, `_cbmap` or `_volume` variants in
/// `source_dir`) and the pixels are appended to the data block, which is
/// created if missing. Existing data is never overwritten.
pub fn repack_free_layout(
    header_path: &Path,
    container_name: &str,
    data_path: &Path,
    source_dir: &Path,
) -> Result<Outcome> {
    settle(
        header_path,
        repack_free(header_path, container_name, data_path, source_dir),
    )
}

fn repack_free(
    header_path: &Path,
    container_name: &str,
    data_path: &Path,
    source_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut header_block = fs::read(header_path)?;
    let mut header = GtexHeader::locate(&header_block)?;

    let source = Source::discover(source_dir, container_name)?;
    let paths = source.paths();
    let first = &paths[0];
    let desc = source.descriptor();
    let topology = source.layout.topology();

    let width = narrow::<u16>(first, "width", desc.width)?;
    let height = narrow::<u16>(first, "height", desc.height)?;
    let depth = narrow::<u16>(first, "depth", desc.depth.max(1))?;
    let declared_mips = narrow::<u8>(first, "mip count", desc.mip_count)?;

    if topology == Topology::Volume && declared_mips > 1 {
        warn!(
            "{}: volume has {} mips, only mip 0 is repacked",
            first.display(),
            declared_mips
        );
    }
    let mip_count = topology.stored_mips(declared_mips);
    let format = PixelFormat::from_dds(desc.format, mip_count as u32);
    let levels = mip_chain(format, desc.width, desc.height, mip_count);

    let mips = gather_mips(&source, &paths, topology, &levels, usize::from(depth))?;

    // Make sure the table has room before the data block grows.
    let position = header.mip_table_position();
    if position > header_block.len() {
        return Err(imgb_common::Error::UnexpectedEof {
            needed: position,
            available: header_block.len(),
        }
        .into());
    }
    let reserved = (header_block.len() - position) / ENTRY_LEN;
    let added = reserve_slots(&mut header_block, reserved, mips.len())?;
    if added > 0 {
        debug!(
            "{}: added {} mip table slots, header block is now {} bytes",
            header_path.display(),
            added,
            header_block.len()
        );
    }

    let data = OpenOptions::new().create(true).append(true).open(data_path)?;
    let cursor = data.metadata()?.len();
    let appended: u64 = mips
        .iter()
        .map(|mip| mip.len().max(MIN_MIP_BYTES) as u64)
        .sum();
    if cursor + appended > u64::from(u32::MAX) {
        return Err(Error::DataBlockTooLarge);
    }

    let mut writer = MipTableWriter::new(BufWriter::new(data), cursor);
    for mip in &mips {
        writer.push_mip(mip)?;
    }
    let entries = writer.finish()?;

    header.format = format.code();
    header.mip_count = mip_count as u8;
    header.topology = topology.code();
    header.width = width;
    header.height = height;
    header.depth = if topology == Topology::Volume { depth } else { 1 };
    header.write_into(&mut header_block)?;
    write_table(&mut header_block, &header, &entries)?;
    fs::write(header_path, &header_block)?;

    for path in &paths {
        info!("Repacked {}", path.display());
    }
    Ok(paths)
}

/// Replacement mips in table order: face-major for cubemaps, the whole
/// slice stack as one entry for volumes.
fn gather_mips<'s>(
    source: &'s Source,
    paths: &[PathBuf],
    topology: Topology,
    levels: &[MipLevel],
    depth: usize,
) -> Result<Vec<Cow<'s, [u8]>>> {
    if topology == Topology::Volume {
        let slice_len = levels[0].size;
        let needed = slice_len * depth;
        let pixels = source.volume_pixels(slice_len)?;
        if pixels.len() < needed {
            return Err(Error::malformed(
                &paths[0],
                format!("holds {} pixel bytes, volume needs {needed}", pixels.len()),
            ));
        }
        let stack = match pixels {
            Cow::Borrowed(bytes) => Cow::Borrowed(&bytes[..needed]),
            Cow::Owned(mut bytes) => {
                bytes.truncate(needed);
                Cow::Owned(bytes)
            }
        };
        return Ok(vec![stack]);
    }

    let sizes: Vec<usize> = levels.iter().map(|level| level.size).collect();
    let face_len = sizes.iter().sum();
    let mut mips = Vec::with_capacity(sizes.len() * Topology::CUBE_FACES);
    for (face, payload) in source.payloads(face_len)?.into_iter().enumerate() {
        let path = paths.get(face).unwrap_or(&paths[0]);
        mips.extend(split_mips(path, payload, &sizes)?.into_iter().map(Cow::Borrowed));
    }
    Ok(mips)
}

/// Narrow a DDS header field to the width the GTEX record stores.
fn narrow<T: TryFrom<u32>>(path: &Path, field: &str, value: u32) -> Result<T> {
    T::try_from(value)
        .map_err(|_| Error::malformed(path, format!("{field} {value} does not fit the container")))
}
