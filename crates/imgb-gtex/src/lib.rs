//! GTEX/IMGB texture codec for the FINAL FANTASY XIII trilogy.
//!
//! Each texture is split across two files: a header block holding a `GTEX`
//! record and a table of `(start, size)` mip entries, and a flat data block
//! (IMGB) holding the pixels. This crate moves textures between that pair
//! and plain DDS files:
//!
//! - [`unpack`] extracts a texture to DDS
//! - [`repack_fixed_layout`] writes an edited DDS back over the original mips
//! - [`repack_free_layout`] rebuilds the header from a DDS and appends the
//!   pixels to the data block
//!
//! PS3 data is converted between console and DDS byte order on the way
//! through (see [`Remap`]).
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use imgb_gtex::{unpack, Outcome, Platform};
//!
//! let outcome = unpack(
//!     Path::new("c001.txbh"),
//!     Path::new("c001.imgb"),
//!     Path::new("out"),
//!     Platform::Pc,
//!     false,
//! )?;
//! if let Outcome::Done { files } = outcome {
//!     println!("wrote {} files", files.len());
//! }
//! # Ok::<(), imgb_gtex::Error>(())
//! ```

use std::path::{Path, PathBuf};

use tracing::warn;

mod error;
pub mod format;
pub mod gtex;
pub mod mip_table;
pub mod naming;
pub mod remap;
mod repack;
mod unpack;

pub use error::{Error, Result};
pub use format::{mip_size, next_mip_dimensions, MipSize, PixelFormat, Topology};
pub use gtex::{find_gtex, GtexHeader};
pub use mip_table::{MipEntry, MipTable, MipTableWriter};
pub use remap::{morton_swizzle, morton_unswizzle, reorder_channels, Platform, Remap};
pub use repack::{repack_fixed_layout, repack_free_layout};
pub use unpack::unpack;

/// Result of processing one header block.
#[derive(Debug)]
pub enum Outcome {
    /// Files produced (unpack) or consumed (repack).
    Done { files: Vec<PathBuf> },
    /// Nothing was written; the reason is file-scoped.
    Skipped { reason: Error },
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }

    pub fn files(&self) -> &[PathBuf] {
        match self {
            Self::Done { files } => files,
            Self::Skipped { .. } => &[],
        }
    }
}

/// Turn file-scoped errors into a logged skip; anything else propagates.
pub(crate) fn settle(header_path: &Path, result: Result<Vec<PathBuf>>) -> Result<Outcome> {
    match result {
        Ok(files) => Ok(Outcome::Done { files }),
        Err(reason) if reason.is_skip() => {
            warn!("Skipped {}: {}", header_path.display(), reason);
            Ok(Outcome::Skipped { reason })
        }
        Err(err) => Err(err),
    }
}
