//! Texture descriptors and DDS file inspection.

use std::fs;
use std::path::Path;

use imgb_common::BinaryReader;

use crate::header::{caps2, DdsHeader, FourCC};
use crate::{Error, Result, DDS_HEADER_LEN, DDS_MAGIC};

/// Pixel layouts a DDS written or read by this crate can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DdsFormat {
    /// 32-bit uncompressed, A8R8G8B8 masks.
    Rgba8,
    /// BC1, 8 bytes per 4x4 block.
    Dxt1,
    /// BC2, 16 bytes per 4x4 block.
    Dxt3,
    /// BC3, 16 bytes per 4x4 block.
    Dxt5,
}

impl DdsFormat {
    /// Whether the format is made of 4x4 compressed blocks.
    pub const fn is_block_compressed(self) -> bool {
        !matches!(self, Self::Rgba8)
    }

    /// Bytes per 4x4 block, or `None` for uncompressed data.
    pub const fn block_bytes(self) -> Option<u32> {
        match self {
            Self::Rgba8 => None,
            Self::Dxt1 => Some(8),
            Self::Dxt3 | Self::Dxt5 => Some(16),
        }
    }

    /// The FourCC written into the pixel format block.
    pub const fn four_cc(self) -> FourCC {
        match self {
            Self::Rgba8 => FourCC::NONE,
            Self::Dxt1 => FourCC::DXT1,
            Self::Dxt3 => FourCC::DXT3,
            Self::Dxt5 => FourCC::DXT5,
        }
    }

    /// Map a FourCC tag (NUL bytes already stripped) back to a format.
    pub fn from_four_cc_str(tag: &str) -> Result<Self> {
        match tag {
            "" => Ok(Self::Rgba8),
            "DXT1" => Ok(Self::Dxt1),
            "DXT3" => Ok(Self::Dxt3),
            "DXT5" => Ok(Self::Dxt5),
            other => Err(Error::UnsupportedFourCC(other.to_owned())),
        }
    }
}

/// Texture shape as expressed by DDS caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Texture2D,
    Cubemap,
    Volume,
}

/// Everything needed to describe a texture independent of its pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDescriptor {
    pub format: DdsFormat,
    pub shape: Shape,
    pub width: u32,
    pub height: u32,
    /// Slice count for volumes; 1 otherwise.
    pub depth: u32,
    pub mip_count: u32,
}

impl TextureDescriptor {
    /// Create a descriptor.
    pub const fn new(
        format: DdsFormat,
        shape: Shape,
        width: u32,
        height: u32,
        depth: u32,
        mip_count: u32,
    ) -> Self {
        Self {
            format,
            shape,
            width,
            height,
            depth,
            mip_count,
        }
    }
}

/// A DDS file split into its descriptor and the pixel bytes after the header.
#[derive(Debug, Clone)]
pub struct DdsImage {
    pub descriptor: TextureDescriptor,
    data: Vec<u8>,
}

impl DdsImage {
    /// Read and parse a DDS file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_vec(data)
    }

    /// Parse a DDS file held in memory.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::from_vec(data.to_vec())
    }

    fn from_vec(data: Vec<u8>) -> Result<Self> {
        let descriptor = read_descriptor(&data)?;
        Ok(Self { descriptor, data })
    }

    /// Pixel bytes following the 128-byte header.
    pub fn payload(&self) -> &[u8] {
        &self.data[DDS_HEADER_LEN..]
    }
}

/// Read the descriptor from the fixed header fields of a DDS file.
///
/// The size and magic are checked before any field is read.
pub fn read_descriptor(data: &[u8]) -> Result<TextureDescriptor> {
    if data.len() < DDS_HEADER_LEN {
        return Err(Error::TooSmall(data.len()));
    }

    let magic: [u8; 4] = [data[0], data[1], data[2], data[3]];
    if &magic != DDS_MAGIC {
        return Err(Error::InvalidMagic(magic));
    }

    let mut reader = BinaryReader::new_at(data, 12);
    let height = reader.read_u32()?;
    let width = reader.read_u32()?;
    let _pitch_or_linear_size = reader.read_u32()?;
    let depth = reader.read_u32()?;
    let mip_count = reader.read_u32()?;

    reader.seek(DdsHeader::FOURCC_OFFSET);
    let tag = reader.read_fixed_string(4, false)?;
    let format = DdsFormat::from_four_cc_str(&tag)?;

    reader.seek(112);
    let surface_caps2 = reader.read_u32()?;
    let shape = if surface_caps2 & caps2::VOLUME != 0 {
        Shape::Volume
    } else if surface_caps2 & caps2::CUBEMAP != 0 {
        Shape::Cubemap
    } else {
        Shape::Texture2D
    };

    Ok(TextureDescriptor {
        format,
        shape,
        width,
        height,
        depth: if shape == Shape::Volume { depth.max(1) } else { 1 },
        mip_count: mip_count.max(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_header;

    #[test]
    fn test_descriptor_survives_header() {
        let cases = [
            TextureDescriptor::new(DdsFormat::Rgba8, Shape::Texture2D, 10, 10, 1, 1),
            TextureDescriptor::new(DdsFormat::Dxt3, Shape::Cubemap, 32, 32, 1, 6),
            TextureDescriptor::new(DdsFormat::Dxt5, Shape::Volume, 64, 32, 4, 1),
        ];

        for desc in cases {
            let header = build_header(&desc);
            assert_eq!(read_descriptor(&header).unwrap(), desc);
        }
    }

    #[test]
    fn test_too_small_checked_first() {
        let data = [0u8; 64];
        assert!(matches!(read_descriptor(&data), Err(Error::TooSmall(64))));
    }

    #[test]
    fn test_bad_magic() {
        let mut data = [0u8; 128];
        data[..4].copy_from_slice(b"XDDS");
        assert!(matches!(read_descriptor(&data), Err(Error::InvalidMagic(m)) if &m == b"XDDS"));
    }

    #[test]
    fn test_unknown_four_cc() {
        let desc = TextureDescriptor::new(DdsFormat::Dxt1, Shape::Texture2D, 8, 8, 1, 1);
        let mut header = build_header(&desc);
        header[84..88].copy_from_slice(b"ATI2");

        match read_descriptor(&header) {
            Err(Error::UnsupportedFourCC(tag)) => assert_eq!(tag, "ATI2"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_zero_mip_count_reads_as_one() {
        let desc = TextureDescriptor::new(DdsFormat::Rgba8, Shape::Texture2D, 4, 4, 1, 1);
        let mut header = build_header(&desc);
        header[28..32].copy_from_slice(&0u32.to_le_bytes());

        assert_eq!(read_descriptor(&header).unwrap().mip_count, 1);
    }

    #[test]
    fn test_payload_follows_header() {
        let desc = TextureDescriptor::new(DdsFormat::Rgba8, Shape::Texture2D, 1, 1, 1, 1);
        let mut file = build_header(&desc).to_vec();
        file.extend_from_slice(&[1, 2, 3, 4]);

        let image = DdsImage::parse(&file).unwrap();
        assert_eq!(image.payload(), &[1, 2, 3, 4]);
    }
}
