//! Error types for DDS handling.

use thiserror::Error;

/// Errors that can occur when working with DDS files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] imgb_common::Error),

    /// File is shorter than the fixed DDS header.
    #[error("DDS file too small: {0} bytes, need at least 128")]
    TooSmall(usize),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Compression tag outside DXT1/DXT3/DXT5 or uncompressed RGBA.
    #[error("unsupported DDS pixel format tag {0:?}")]
    UnsupportedFourCC(String),
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
