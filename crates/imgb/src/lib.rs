//! IMGB - FINAL FANTASY XIII trilogy texture extraction and repacking library.
//!
//! This crate provides a unified interface to the IMGB library crates.
//!
//! # Crates
//!
//! - [`imgb_common`] - Common utilities (endian-aware binary reading and writing)
//! - [`imgb_dds`] - DDS header synthesis and parsing
//! - [`imgb_gtex`] - GTEX header blocks, mip tables, unpack and repack
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use imgb::prelude::*;
//!
//! let header = Path::new("c001.txbh");
//! let data = Path::new("c001.imgb");
//!
//! // Extract, edit the DDS files in `out`, then write them back
//! unpack(header, data, Path::new("out"), Platform::Ps3, false)?;
//! match repack_fixed_layout(header, data, Path::new("out"), Platform::Ps3)? {
//!     Outcome::Done { files } => println!("repacked {} files", files.len()),
//!     Outcome::Skipped { reason } => println!("skipped: {reason}"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use imgb_common as common;
pub use imgb_dds as dds;
pub use imgb_gtex as gtex;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use imgb_common::{BinaryReader, BinaryWriter, Endian};
    pub use imgb_dds::{build_header, DdsFormat, DdsImage, Shape, TextureDescriptor};
    pub use imgb_gtex::{
        find_gtex, mip_size, repack_fixed_layout, repack_free_layout, unpack, GtexHeader,
        MipEntry, MipTable, Outcome, PixelFormat, Platform, Remap, Topology,
    };
}

// Re-export commonly used types at the crate root
pub use imgb_gtex::{Outcome, Platform};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
