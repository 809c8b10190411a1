//! Error types for GTEX/IMGB handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while unpacking or repacking a texture.
///
/// Everything except I/O failures is scoped to a single container file; see
/// [`Error::is_skip`].
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] imgb_common::Error),

    /// The header block has no `GTEX` tag.
    #[error("unable to find GTEX chunk")]
    GtexNotFound,

    /// Pixel format or topology outside the closed enumerations.
    #[error("unsupported texture format {format} or type {topology}")]
    UnsupportedFormatOrType { format: u8, topology: u8 },

    /// GTEX record declares zero mips.
    #[error("GTEX record declares no mips")]
    EmptyMipChain,

    /// A mip table entry points outside the data block.
    #[error("mip entry {index} ({start}+{size}) lies outside the {len}-byte data block")]
    MipOutOfRange {
        index: usize,
        start: u32,
        size: u32,
        len: u64,
    },

    /// A source image (or one face/slice of it) is absent.
    #[error("missing image file {}", .0.display())]
    MissingSiblingFile(PathBuf),

    /// Replacement image disagrees with the layout the container requires.
    #[error("{} {field} is {actual}, container expects {expected}", .path.display())]
    DescriptorMismatch {
        path: PathBuf,
        field: &'static str,
        expected: u32,
        actual: u32,
    },

    /// Replacement image is not a usable DDS.
    #[error("invalid image file {}: {reason}", .path.display())]
    MalformedSourceImage { path: PathBuf, reason: String },

    /// Swizzled mip does not hold exactly width x height pixels.
    #[error("swizzled mip holds {actual} bytes, {width}x{height} needs {expected}")]
    PixelCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Data block would grow past the 4 GiB addressable by the mip table.
    #[error("data block exceeds the 32-bit offset range")]
    DataBlockTooLarge,
}

impl Error {
    /// Whether the error only affects the current container file.
    ///
    /// Skips are logged and reported as [`crate::Outcome::Skipped`];
    /// anything else aborts the caller.
    pub fn is_skip(&self) -> bool {
        !matches!(
            self,
            Self::Io(_) | Self::Common(imgb_common::Error::Io(_)) | Self::DataBlockTooLarge
        )
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::MalformedSourceImage {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for GTEX/IMGB operations.
pub type Result<T> = std::result::Result<T, Error>;
