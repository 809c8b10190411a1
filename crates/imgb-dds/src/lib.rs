//! DDS handling for IMGB textures.
//!
//! Textures leave the IMGB container as plain DDS files: a fixed 128-byte
//! header (magic plus the 124-byte `DDS_HEADER`) followed directly by the
//! raw pixel bytes, with no DX10 extension and no footer.
//!
//! This crate provides both directions of that header:
//!
//! - [`build_header`] synthesizes a header from a [`TextureDescriptor`]
//! - [`DdsImage::parse`] reads a descriptor and payload back from a DDS file
//!
//! # Example
//!
//! ```
//! use imgb_dds::{build_header, DdsFormat, DdsImage, Shape, TextureDescriptor};
//!
//! let desc = TextureDescriptor::new(DdsFormat::Dxt1, Shape::Texture2D, 64, 64, 1, 1);
//! let mut file = build_header(&desc).to_vec();
//! file.extend_from_slice(&[0u8; 2048]);
//!
//! let image = DdsImage::parse(&file)?;
//! assert_eq!(image.descriptor, desc);
//! assert_eq!(image.payload().len(), 2048);
//! # Ok::<(), imgb_dds::Error>(())
//! ```

mod descriptor;
mod error;
mod header;

pub use descriptor::{read_descriptor, DdsFormat, DdsImage, Shape, TextureDescriptor};
pub use error::{Error, Result};
pub use header::{build_header, caps, caps2, flags, pf_flags, DdsHeader, DdsPixelFormat, FourCC};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// Length of the magic plus the fixed header.
pub const DDS_HEADER_LEN: usize = 128;
