//! Console pixel remapping.
//!
//! PS3 stores uncompressed textures with ARGB channel order, and
//! `ConsoleClassic` RGBA8 textures are additionally Morton swizzled. PC and
//! Xbox 360 data is copied verbatim.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::format::{PixelFormat, Topology};
use crate::{Error, Result};

/// Platform the container was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    #[default]
    Pc,
    Ps3,
    X360,
}

impl Platform {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pc => "pc",
            Self::Ps3 => "ps3",
            Self::X360 => "x360",
        }
    }

    /// Console data left in its stored layout because no remap exists for it.
    pub const fn keeps_console_layout(self) -> bool {
        matches!(self, Self::X360)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a platform name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform '{0}' (expected pc, ps3 or x360)")]
pub struct ParsePlatformError(String);

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pc" => Ok(Self::Pc),
            "ps3" => Ok(Self::Ps3),
            "x360" | "xbox360" => Ok(Self::X360),
            _ => Err(ParsePlatformError(s.to_string())),
        }
    }
}

/// Transform applied to each mip between container and DDS byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remap {
    /// Bytes pass through untouched.
    Verbatim,
    /// ARGB <-> BGRA per pixel.
    Reorder,
    /// Morton unswizzle followed by channel reorder.
    UnswizzleReorder,
}

impl Remap {
    /// Pick the transform for a texture, first matching rule wins.
    pub fn select(platform: Platform, format: PixelFormat, topology: Topology) -> Self {
        match (platform, format, topology) {
            (Platform::Pc | Platform::X360, _, _) => Self::Verbatim,
            (Platform::Ps3, PixelFormat::Rgba8, Topology::ConsoleClassic) => Self::UnswizzleReorder,
            (Platform::Ps3, PixelFormat::Rgba8, Topology::Classic) => Self::Reorder,
            (Platform::Ps3, PixelFormat::Rgba8Mips | PixelFormat::Rgba8, _) => Self::Reorder,
            (Platform::Ps3, PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5, _) => {
                Self::Verbatim
            }
        }
    }

    /// Convert container bytes of one `width` x `height` mip to DDS order.
    pub fn apply<'a>(self, src: &'a [u8], width: u32, height: u32) -> Result<Cow<'a, [u8]>> {
        match self {
            Self::Verbatim => Ok(Cow::Borrowed(src)),
            Self::Reorder => Ok(Cow::Owned(reorder_channels(src))),
            Self::UnswizzleReorder => {
                let mut pixels = morton_unswizzle(src, width, height)?;
                reorder_in_place(&mut pixels);
                Ok(Cow::Owned(pixels))
            }
        }
    }

    /// Convert DDS bytes back to container order; undoes [`Remap::apply`].
    pub fn apply_inverse<'a>(
        self,
        src: &'a [u8],
        width: u32,
        height: u32,
    ) -> Result<Cow<'a, [u8]>> {
        match self {
            Self::Verbatim => Ok(Cow::Borrowed(src)),
            Self::Reorder => Ok(Cow::Owned(reorder_channels(src))),
            Self::UnswizzleReorder => {
                let reordered = reorder_channels(src);
                Ok(Cow::Owned(morton_swizzle(&reordered, width, height)?))
            }
        }
    }
}

/// Decode a Morton index into (x, y).
///
/// Bits are taken alternately for x and y; a dimension stops taking bits
/// once it has been halved down to 1.
#[inline]
pub fn morton_decode(index: usize, width: u32, height: u32) -> (usize, usize) {
    let (mut x, mut y) = (0usize, 0usize);
    let (mut x_bit, mut y_bit) = (1usize, 1usize);
    let (mut w, mut h) = (width, height);
    let mut rest = index;

    while w > 1 || h > 1 {
        if w > 1 {
            x += x_bit * (rest & 1);
            rest >>= 1;
            x_bit <<= 1;
            w >>= 1;
        }
        if h > 1 {
            y += y_bit * (rest & 1);
            rest >>= 1;
            y_bit <<= 1;
            h >>= 1;
        }
    }

    (x, y)
}

fn pixel_bytes(width: u32, height: u32, actual: usize) -> Result<usize> {
    let expected = width as usize * height as usize * 4;
    if actual != expected {
        return Err(Error::PixelCountMismatch {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(expected)
}

/// Move 4-byte pixels from Morton order to row-major order.
///
/// Non power-of-two dimensions can decode to coordinates past the image;
/// those pixels are dropped and their destination stays zero.
pub fn morton_unswizzle(src: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let len = pixel_bytes(width, height, src.len())?;
    let mut dst = vec![0u8; len];

    for (m, pixel) in src.chunks_exact(4).enumerate() {
        let (x, y) = morton_decode(m, width, height);
        if x >= width as usize || y >= height as usize {
            continue;
        }
        let at = (y * width as usize + x) * 4;
        dst[at..at + 4].copy_from_slice(pixel);
    }

    Ok(dst)
}

/// Move 4-byte pixels from row-major order to Morton order.
pub fn morton_swizzle(src: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let len = pixel_bytes(width, height, src.len())?;
    let mut dst = vec![0u8; len];

    for (m, slot) in dst.chunks_exact_mut(4).enumerate() {
        let (x, y) = morton_decode(m, width, height);
        if x >= width as usize || y >= height as usize {
            continue;
        }
        let at = (y * width as usize + x) * 4;
        slot.copy_from_slice(&src[at..at + 4]);
    }

    Ok(dst)
}

/// Rewrite each (A, R, G, B) pixel as (B, G, R, A).
///
/// A trailing partial pixel is copied unchanged.
pub fn reorder_channels(src: &[u8]) -> Vec<u8> {
    let mut out = src.to_vec();
    reorder_in_place(&mut out);
    out
}

fn reorder_in_place(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(4) {
        pixel.reverse();
    }
}
