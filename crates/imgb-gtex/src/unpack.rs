//! Container to DDS extraction.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use imgb_dds::{build_header, Shape, TextureDescriptor};
use memmap2::Mmap;
use tracing::{debug, info, warn};

use crate::format::{mip_chain, PixelFormat, Topology};
use crate::gtex::GtexHeader;
use crate::mip_table::{MipEntry, MipTable};
use crate::naming;
use crate::remap::{Platform, Remap};
use crate::{settle, Outcome, Result};

/// One DDS file to produce.
struct Output<'t> {
    path: PathBuf,
    descriptor: TextureDescriptor,
    entries: &'t [MipEntry],
}

/// Extract the texture described by `header_path` from the data block.
///
/// Classic textures produce `<name>.dds`, cubemaps six face files
/// `<name>_cbmap_<1..6>.dds` and volumes `<name>_volume.dds`. Existing
/// files are overwritten. File-scoped problems come back as
/// [`Outcome::Skipped`] without touching `out_dir`.
pub fn unpack(
    header_path: &Path,
    data_path: &Path,
    out_dir: &Path,
    platform: Platform,
    verbose: bool,
) -> Result<Outcome> {
    settle(
        header_path,
        unpack_texture(header_path, data_path, out_dir, platform, verbose),
    )
}

fn unpack_texture(
    header_path: &Path,
    data_path: &Path,
    out_dir: &Path,
    platform: Platform,
    verbose: bool,
) -> Result<Vec<PathBuf>> {
    let header_block = fs::read(header_path)?;
    let header = GtexHeader::locate(&header_block)?;
    let (format, topology) = header.validate()?;
    log_header(header_path, &header, verbose);
    if platform.keeps_console_layout() {
        warn!(
            "{}: {} textures are extracted as stored and will not be unswizzled",
            header_path.display(),
            platform
        );
    }

    let table = MipTable::read(&header_block, &header, topology)?;

    let data_file = File::open(data_path)?;
    // SAFETY: the data block is only read while this mapping is alive.
    let data = unsafe { Mmap::map(&data_file)? };
    table.check_bounds(data.len() as u64)?;

    if topology.base() == Topology::Volume && header.mip_count > 1 {
        warn!(
            "{}: volume declares {} mips, only mip 0 is extracted",
            header_path.display(),
            header.mip_count
        );
    }

    let name = naming::container_name(header_path);
    let outputs = plan_outputs(&header, format, topology, &table, out_dir, &name);
    let remap = Remap::select(platform, format, topology);
    debug!("{}: remap {:?} for {}", header_path.display(), remap, platform);

    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(outputs.len());
    for output in outputs {
        write_output(&output, format, remap, &data)?;
        info!("Unpacked {}", output.path.display());
        written.push(output.path);
    }
    Ok(written)
}

fn plan_outputs<'t>(
    header: &GtexHeader,
    format: PixelFormat,
    topology: Topology,
    table: &'t MipTable,
    out_dir: &Path,
    name: &str,
) -> Vec<Output<'t>> {
    let (width, height) = (u32::from(header.width), u32::from(header.height));
    let mip_count = u32::from(header.mip_count);
    let dds_format = format.dds_format();

    match topology.base() {
        Topology::Cubemap => table
            .faces(header.mip_count as usize)
            .enumerate()
            .map(|(face, entries)| Output {
                path: naming::sibling_path(out_dir, name, topology, face + 1),
                descriptor: TextureDescriptor::new(
                    dds_format,
                    Shape::Texture2D,
                    width,
                    height,
                    1,
                    mip_count,
                ),
                entries,
            })
            .collect(),
        Topology::Volume => vec![Output {
            path: naming::combined_path(out_dir, name, topology),
            descriptor: TextureDescriptor::new(
                dds_format,
                Shape::Volume,
                width,
                height,
                u32::from(header.depth).max(1),
                1,
            ),
            entries: table.entries(),
        }],
        _ => vec![Output {
            path: naming::classic_path(out_dir, name),
            descriptor: TextureDescriptor::new(
                dds_format,
                Shape::Texture2D,
                width,
                height,
                1,
                mip_count,
            ),
            entries: table.entries(),
        }],
    }
}

fn write_output(output: &Output<'_>, format: PixelFormat, remap: Remap, data: &[u8]) -> Result<()> {
    let desc = &output.descriptor;
    let levels = mip_chain(format, desc.width, desc.height, output.entries.len());

    // Remap everything first so a bad mip leaves no partial file behind.
    let mut mips = Vec::with_capacity(output.entries.len());
    for (entry, level) in output.entries.iter().zip(&levels) {
        mips.push(remap.apply(&data[entry.range()], level.width, level.height)?);
    }

    let mut writer = BufWriter::new(File::create(&output.path)?);
    writer.write_all(&build_header(desc))?;
    for mip in &mips {
        writer.write_all(mip)?;
    }
    writer.flush()?;
    Ok(())
}

fn log_header(path: &Path, header: &GtexHeader, verbose: bool) {
    macro_rules! emit {
        ($level:ident) => {
            $level!(
                "{}: GTEX at {:#x}, format {}, type {}, {}x{}x{}, {} mips, table at {:#x}",
                path.display(),
                header.offset,
                header.format,
                header.topology,
                header.width,
                header.height,
                header.depth,
                header.mip_count,
                header.mip_table_position()
            )
        };
    }

    if verbose {
        emit!(info);
    } else {
        emit!(debug);
    }
}
