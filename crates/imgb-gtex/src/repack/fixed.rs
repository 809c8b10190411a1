//! In-place repack into an existing data block.

use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::source::{expect_field, split_mips, Layout, Source};
use crate::format::{mip_chain, PixelFormat, Topology};
use crate::gtex::GtexHeader;
use crate::mip_table::{MipEntry, MipTable};
use crate::naming;
use crate::remap::{Platform, Remap};
use crate::{settle, Error, Outcome, Result};

/// Overwrite a texture's mips in place with edited DDS files.
///
/// The replacement must match the container exactly (dimensions, mip count,
/// pixel format and, for volumes, depth). Bytes land at the offsets in the
/// existing mip table; the header block is left untouched. On PS3 the
/// pixels are converted back to console order first.
pub fn repack_fixed_layout(
    header_path: &Path,
    data_path: &Path,
    source_dir: &Path,
    platform: Platform,
) -> Result<Outcome> {
    settle(
        header_path,
        repack_fixed(header_path, data_path, source_dir, platform),
    )
}

fn repack_fixed(
    header_path: &Path,
    data_path: &Path,
    source_dir: &Path,
    platform: Platform,
) -> Result<Vec<PathBuf>> {
    let header_block = fs::read(header_path)?;
    let header = GtexHeader::locate(&header_block)?;
    let (format, topology) = header.validate()?;
    let table = MipTable::read(&header_block, &header, topology)?;

    let name = naming::container_name(header_path);
    let source = Source::for_topology(source_dir, &name, topology, header.depth)?;
    check_matches_container(&source, &header, format, topology)?;

    let data_len = fs::metadata(data_path)?.len();
    table.check_bounds(data_len)?;

    let remap = Remap::select(platform, format, topology);
    debug!("{}: remap {:?} for {}", header_path.display(), remap, platform);

    let writes = collect_writes(&source, &header, format, topology, &table, remap)?;

    let mut data = OpenOptions::new().write(true).open(data_path)?;
    for (start, bytes) in &writes {
        data.seek(SeekFrom::Start(u64::from(*start)))?;
        data.write_all(bytes)?;
    }
    data.flush()?;

    let paths = source.paths();
    for path in &paths {
        info!("Repacked {}", path.display());
    }
    Ok(paths)
}

/// Every replacement image must describe exactly what the container holds.
fn check_matches_container(
    source: &Source,
    header: &GtexHeader,
    format: PixelFormat,
    topology: Topology,
) -> Result<()> {
    let is_volume = topology.base() == Topology::Volume;
    let mip_count = topology.stored_mips(header.mip_count) as u32;

    for (path, desc) in source.images() {
        expect_field(path, "width", u32::from(header.width), desc.width)?;
        expect_field(path, "height", u32::from(header.height), desc.height)?;
        expect_field(path, "mip count", mip_count, desc.mip_count)?;
        if desc.format != format.dds_format() {
            let actual = PixelFormat::from_dds(desc.format, desc.mip_count);
            expect_field(path, "format", u32::from(format.code()), u32::from(actual.code()))?;
        }
        if is_volume && source.layout == Layout::CombinedVolume {
            expect_field(path, "depth", u32::from(header.depth.max(1)), desc.depth)?;
        }
    }
    Ok(())
}

/// Container-order bytes for every table entry, keyed by start offset.
fn collect_writes<'s>(
    source: &'s Source,
    header: &GtexHeader,
    format: PixelFormat,
    topology: Topology,
    table: &MipTable,
    remap: Remap,
) -> Result<Vec<(u32, Cow<'s, [u8]>)>> {
    let (width, height) = (u32::from(header.width), u32::from(header.height));
    let paths = source.paths();

    if topology.base() == Topology::Volume {
        let entry = table.entries()[0];
        let depth = usize::from(header.depth.max(1));
        let needed = entry.size as usize;
        let pixels = source.volume_pixels(needed.div_ceil(depth))?;
        if pixels.len() < needed {
            return Err(Error::malformed(
                &paths[0],
                format!("holds {} pixel bytes, volume needs {needed}", pixels.len()),
            ));
        }
        // the entry is rewritten in full, never a prefix of it
        let pixels = match pixels {
            Cow::Borrowed(bytes) => Cow::Borrowed(&bytes[..needed]),
            Cow::Owned(mut bytes) => {
                bytes.truncate(needed);
                Cow::Owned(bytes)
            }
        };
        let converted = match remap {
            Remap::Verbatim => pixels,
            _ => Cow::Owned(remap.apply_inverse(&pixels, width, height)?.into_owned()),
        };
        return Ok(vec![(entry.start, converted)]);
    }

    let mips_per_face = header.mip_count as usize;
    let levels = mip_chain(format, width, height, mips_per_face);
    let face_groups: Vec<&[MipEntry]> = table.faces(mips_per_face).collect();
    let face_len: usize = face_groups[0].iter().map(|e| e.size as usize).sum();
    let payloads = source.payloads(face_len)?;

    let mut writes = Vec::with_capacity(table.len());
    for (face, (entries, payload)) in face_groups.iter().zip(payloads).enumerate() {
        let path = paths.get(face).unwrap_or(&paths[0]);
        let sizes: Vec<usize> = entries.iter().map(|e| e.size as usize).collect();
        let mips = split_mips(path, payload, &sizes)?;

        for ((entry, mip), level) in entries.iter().zip(mips).zip(&levels) {
            let bytes = remap.apply_inverse(mip, level.width, level.height)?;
            writes.push((entry.start, bytes));
        }
    }
    Ok(writes)
}
