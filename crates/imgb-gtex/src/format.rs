//! Pixel formats, topologies and mip size math.

use imgb_dds::DdsFormat;

use crate::{Error, Result};

/// GTEX pixel format codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PixelFormat {
    /// R8G8B8A8 carrying a mip chain.
    Rgba8Mips = 3,
    /// R8G8B8A8, single level.
    Rgba8 = 4,
    Dxt1 = 24,
    Dxt3 = 25,
    Dxt5 = 26,
}

impl PixelFormat {
    /// Raw code stored in the GTEX record.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// The DDS pixel layout this format is exported as.
    pub const fn dds_format(self) -> DdsFormat {
        match self {
            Self::Rgba8Mips | Self::Rgba8 => DdsFormat::Rgba8,
            Self::Dxt1 => DdsFormat::Dxt1,
            Self::Dxt3 => DdsFormat::Dxt3,
            Self::Dxt5 => DdsFormat::Dxt5,
        }
    }

    /// Pick the GTEX code for an imported DDS.
    ///
    /// Uncompressed images map to 3 when they carry mips and 4 otherwise.
    pub const fn from_dds(format: DdsFormat, mip_count: u32) -> Self {
        match format {
            DdsFormat::Rgba8 if mip_count > 1 => Self::Rgba8Mips,
            DdsFormat::Rgba8 => Self::Rgba8,
            DdsFormat::Dxt1 => Self::Dxt1,
            DdsFormat::Dxt3 => Self::Dxt3,
            DdsFormat::Dxt5 => Self::Dxt5,
        }
    }

    pub const fn is_block_compressed(self) -> bool {
        matches!(self, Self::Dxt1 | Self::Dxt3 | Self::Dxt5)
    }
}

impl TryFrom<u8> for PixelFormat {
    type Error = u8;

    fn try_from(code: u8) -> std::result::Result<Self, u8> {
        match code {
            3 => Ok(Self::Rgba8Mips),
            4 => Ok(Self::Rgba8),
            24 => Ok(Self::Dxt1),
            25 => Ok(Self::Dxt3),
            26 => Ok(Self::Dxt5),
            other => Err(other),
        }
    }
}

/// GTEX texture type codes.
///
/// The console variants lay their mip tables out exactly like the base
/// types; on PS3 `ConsoleClassic` additionally marks swizzled pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Topology {
    Classic = 0,
    Cubemap = 1,
    Volume = 2,
    ConsoleClassic = 4,
    ConsoleCubemap = 5,
}

impl Topology {
    /// Number of cubemap faces.
    pub const CUBE_FACES: usize = 6;

    /// Raw code stored in the GTEX record.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Collapse console variants onto the shape they share with PC.
    pub const fn base(self) -> Self {
        match self {
            Self::Classic | Self::ConsoleClassic => Self::Classic,
            Self::Cubemap | Self::ConsoleCubemap => Self::Cubemap,
            Self::Volume => Self::Volume,
        }
    }

    /// Mips actually stored per face; volumes keep only mip 0.
    pub const fn stored_mips(self, mip_count: u8) -> usize {
        match self.base() {
            Self::Volume => 1,
            _ => mip_count as usize,
        }
    }

    /// Number of mip table entries for a declared mip count.
    pub const fn entry_count(self, mip_count: u8) -> usize {
        match self.base() {
            Self::Cubemap => mip_count as usize * Self::CUBE_FACES,
            Self::Volume => 1,
            _ => mip_count as usize,
        }
    }
}

impl TryFrom<u8> for Topology {
    type Error = u8;

    fn try_from(code: u8) -> std::result::Result<Self, u8> {
        match code {
            0 => Ok(Self::Classic),
            1 => Ok(Self::Cubemap),
            2 => Ok(Self::Volume),
            4 => Ok(Self::ConsoleClassic),
            5 => Ok(Self::ConsoleCubemap),
            other => Err(other),
        }
    }
}

/// Resolve a raw (format, type) pair against the closed enumerations.
pub fn validate_codes(format: u8, topology: u8) -> Result<(PixelFormat, Topology)> {
    match (PixelFormat::try_from(format), Topology::try_from(topology)) {
        (Ok(format), Ok(topology)) => Ok((format, topology)),
        _ => Err(Error::UnsupportedFormatOrType { format, topology }),
    }
}

/// Byte size of one mip and the working dimensions it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipSize {
    pub size: usize,
    /// Width after block padding.
    pub width: u32,
    /// Height after block padding.
    pub height: u32,
}

/// Compute the byte size of one mip level.
///
/// Block-compressed formats pad both dimensions up to a multiple of 4
/// first; the padding only affects the returned working dimensions.
pub fn mip_size(format: PixelFormat, width: u32, height: u32) -> MipSize {
    match format {
        PixelFormat::Rgba8Mips | PixelFormat::Rgba8 => MipSize {
            size: height as usize * width as usize * 4,
            width,
            height,
        },
        PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5 => {
            let width = pad_to_block(width);
            let height = pad_to_block(height);
            let texels = height as usize * width as usize;
            let size = if format == PixelFormat::Dxt1 {
                texels * 4 / 8
            } else {
                texels * 4 / 4
            };
            MipSize {
                size,
                width,
                height,
            }
        }
    }
}

/// Dimensions of the next smaller mip.
///
/// RGBA8-with-mips bottoms out at 1x1; every other format stops at one
/// 4x4 block.
pub fn next_mip_dimensions(format: PixelFormat, width: u32, height: u32) -> (u32, u32) {
    let floor = match format {
        PixelFormat::Rgba8Mips => 1,
        _ => 4,
    };
    ((width / 2).max(floor), (height / 2).max(floor))
}

/// One level of a mip chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipLevel {
    /// Logical width of this level.
    pub width: u32,
    /// Logical height of this level.
    pub height: u32,
    pub size: usize,
}

/// Walk a mip chain from the base dimensions.
pub fn mip_chain(format: PixelFormat, width: u32, height: u32, count: usize) -> Vec<MipLevel> {
    let mut levels = Vec::with_capacity(count);
    let (mut w, mut h) = (width, height);
    for _ in 0..count {
        levels.push(MipLevel {
            width: w,
            height: h,
            size: mip_size(format, w, h).size,
        });
        (w, h) = next_mip_dimensions(format, w, h);
    }
    levels
}

fn pad_to_block(value: u32) -> u32 {
    value + (4 - value % 4) % 4
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FORMATS: [PixelFormat; 5] = [
        PixelFormat::Rgba8Mips,
        PixelFormat::Rgba8,
        PixelFormat::Dxt1,
        PixelFormat::Dxt3,
        PixelFormat::Dxt5,
    ];

    #[test]
    fn test_dxt1_100x100() {
        let mip = mip_size(PixelFormat::Dxt1, 100, 100);
        assert_eq!(mip.size, 5000);
        assert_eq!((mip.width, mip.height), (100, 100));
    }

    #[test]
    fn test_rgba8_10x10() {
        let mip = mip_size(PixelFormat::Rgba8, 10, 10);
        assert_eq!(mip.size, 400);
        assert_eq!((mip.width, mip.height), (10, 10));
    }

    #[test]
    fn test_block_padding() {
        let mip = mip_size(PixelFormat::Dxt5, 10, 6);
        assert_eq!((mip.width, mip.height), (12, 8));
        assert_eq!(mip.size, 12 * 8);

        let mip = mip_size(PixelFormat::Dxt1, 1, 1);
        assert_eq!((mip.width, mip.height), (4, 4));
        assert_eq!(mip.size, 8);
    }

    #[test]
    fn test_sizes_divisible_by_unit() {
        for format in ALL_FORMATS {
            for width in 1..40 {
                for height in [1, 2, 3, 4, 5, 17, 64] {
                    let mip = mip_size(format, width, height);
                    if format.is_block_compressed() {
                        assert_eq!(mip.width % 4, 0);
                        assert_eq!(mip.height % 4, 0);
                        let block = if format == PixelFormat::Dxt1 { 8 } else { 16 };
                        assert_eq!(mip.size % block, 0, "{format:?} {width}x{height}");
                    } else {
                        assert_eq!(mip.size % 4, 0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_next_mip_floors() {
        assert_eq!(next_mip_dimensions(PixelFormat::Rgba8Mips, 4, 1), (2, 1));
        assert_eq!(next_mip_dimensions(PixelFormat::Rgba8Mips, 1, 1), (1, 1));
        assert_eq!(next_mip_dimensions(PixelFormat::Dxt1, 8, 2), (4, 4));
        assert_eq!(next_mip_dimensions(PixelFormat::Dxt5, 64, 32), (32, 16));
    }

    #[test]
    fn test_mip_chain() {
        let chain = mip_chain(PixelFormat::Dxt1, 16, 16, 4);
        let sizes: Vec<_> = chain.iter().map(|l| l.size).collect();
        assert_eq!(sizes, vec![128, 32, 8, 8]);

        let chain = mip_chain(PixelFormat::Rgba8Mips, 4, 2, 3);
        let dims: Vec<_> = chain.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(dims, vec![(4, 2), (2, 1), (1, 1)]);
    }

    #[test]
    fn test_codes() {
        for format in ALL_FORMATS {
            assert_eq!(PixelFormat::try_from(format.code()), Ok(format));
        }
        assert_eq!(PixelFormat::try_from(5), Err(5));
        assert_eq!(Topology::try_from(3), Err(3));
        assert!(matches!(
            validate_codes(4, 3),
            Err(Error::UnsupportedFormatOrType {
                format: 4,
                topology: 3
            })
        ));
        assert_eq!(
            validate_codes(26, 5).unwrap(),
            (PixelFormat::Dxt5, Topology::ConsoleCubemap)
        );
    }

    #[test]
    fn test_entry_counts() {
        assert_eq!(Topology::Classic.entry_count(5), 5);
        assert_eq!(Topology::ConsoleCubemap.entry_count(3), 18);
        assert_eq!(Topology::Volume.entry_count(4), 1);
        assert_eq!(Topology::Volume.stored_mips(4), 1);
    }

    #[test]
    fn test_from_dds() {
        assert_eq!(PixelFormat::from_dds(DdsFormat::Rgba8, 1), PixelFormat::Rgba8);
        assert_eq!(PixelFormat::from_dds(DdsFormat::Rgba8, 5), PixelFormat::Rgba8Mips);
        assert_eq!(PixelFormat::from_dds(DdsFormat::Dxt3, 5), PixelFormat::Dxt3);
    }
}
