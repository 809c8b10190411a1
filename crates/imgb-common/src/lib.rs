//! Common utilities for IMGB tooling.
//!
//! This crate provides the byte-level building blocks shared by the other
//! IMGB crates:
//!
//! - [`BinaryReader`] - Zero-copy, endian-aware reading from byte slices
//! - [`BinaryWriter`] - Endian-aware writing into any [`std::io::Write`]
//! - [`Endian`] - Byte order selector used by both

mod error;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Re-export memchr for SIMD-accelerated byte searching
pub use memchr;

/// Byte order of a multi-byte field.
///
/// Container (GTEX) fields are big-endian; DDS fields and the header-block
/// size field are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}
