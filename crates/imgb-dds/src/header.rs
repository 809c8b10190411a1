//! DDS header structures and synthesis.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::descriptor::{DdsFormat, Shape, TextureDescriptor};
use crate::{DDS_HEADER_LEN, DDS_MAGIC};

/// `DDS_HEADER.dwFlags` bits.
pub mod flags {
    pub const CAPS: u32 = 0x1;
    pub const HEIGHT: u32 = 0x2;
    pub const WIDTH: u32 = 0x4;
    pub const PITCH: u32 = 0x8;
    pub const PIXELFORMAT: u32 = 0x1000;
    pub const MIPMAPCOUNT: u32 = 0x20000;
    pub const LINEARSIZE: u32 = 0x80000;
    pub const DEPTH: u32 = 0x800000;
}

/// `DDS_PIXELFORMAT.dwFlags` bits.
pub mod pf_flags {
    pub const ALPHAPIXELS: u32 = 0x1;
    pub const FOURCC: u32 = 0x4;
    pub const RGB: u32 = 0x40;
}

/// `DDS_HEADER.dwCaps` bits.
pub mod caps {
    pub const COMPLEX: u32 = 0x8;
    pub const TEXTURE: u32 = 0x1000;
    pub const MIPMAP: u32 = 0x400000;
}

/// `DDS_HEADER.dwCaps2` bits.
pub mod caps2 {
    pub const CUBEMAP: u32 = 0x200;
    pub const CUBEMAP_POSITIVEX: u32 = 0x400;
    pub const CUBEMAP_NEGATIVEX: u32 = 0x800;
    pub const CUBEMAP_POSITIVEY: u32 = 0x1000;
    pub const CUBEMAP_NEGATIVEY: u32 = 0x2000;
    pub const CUBEMAP_POSITIVEZ: u32 = 0x4000;
    pub const CUBEMAP_NEGATIVEZ: u32 = 0x8000;
    /// The cubemap bit together with all six face bits.
    pub const CUBEMAP_ALL_FACES: u32 = CUBEMAP
        | CUBEMAP_POSITIVEX
        | CUBEMAP_NEGATIVEX
        | CUBEMAP_POSITIVEY
        | CUBEMAP_NEGATIVEY
        | CUBEMAP_POSITIVEZ
        | CUBEMAP_NEGATIVEZ;
    pub const VOLUME: u32 = 0x200000;
}

/// DDS file header, following the 4-byte magic.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeader {
    /// Header size (should be 124).
    pub size: u32,
    /// Header flags.
    pub flags: u32,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Pitch or linear size.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: u32,
    /// Surface capabilities 2.
    pub caps2: u32,
    /// Surface capabilities 3.
    pub caps3: u32,
    /// Surface capabilities 4.
    pub caps4: u32,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    /// Byte offset of the FourCC from the start of the file.
    pub const FOURCC_OFFSET: usize = 84;
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    /// Pixel format flags.
    pub flags: u32,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected structure size.
    pub const SIZE: u32 = 32;

    fn for_format(format: DdsFormat) -> Self {
        match format {
            DdsFormat::Rgba8 => Self {
                size: Self::SIZE,
                flags: pf_flags::ALPHAPIXELS | pf_flags::RGB,
                four_cc: FourCC::NONE,
                rgb_bit_count: 32,
                r_bit_mask: 0x00FF_0000,
                g_bit_mask: 0x0000_FF00,
                b_bit_mask: 0x0000_00FF,
                a_bit_mask: 0xFF00_0000,
            },
            DdsFormat::Dxt1 | DdsFormat::Dxt3 | DdsFormat::Dxt5 => Self {
                size: Self::SIZE,
                flags: pf_flags::FOURCC,
                four_cc: format.four_cc(),
                rgb_bit_count: 0,
                r_bit_mask: 0,
                g_bit_mask: 0,
                b_bit_mask: 0,
                a_bit_mask: 0,
            },
        }
    }
}

/// Four-character code for compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// No compression.
    pub const NONE: Self = Self([0; 4]);
    /// DXT1 compression.
    pub const DXT1: Self = Self(*b"DXT1");
    /// DXT3 compression.
    pub const DXT3: Self = Self(*b"DXT3");
    /// DXT5 compression.
    pub const DXT5: Self = Self(*b"DXT5");
}

/// Build the 128-byte DDS header (magic included) for a texture.
///
/// The result only depends on the descriptor, never on pixel data.
pub fn build_header(desc: &TextureDescriptor) -> [u8; DDS_HEADER_LEN] {
    let has_mips = desc.mip_count > 1;
    let is_volume = desc.shape == Shape::Volume;

    let mut header_flags = flags::CAPS | flags::HEIGHT | flags::WIDTH | flags::PIXELFORMAT;
    if desc.format.is_block_compressed() {
        header_flags |= flags::LINEARSIZE;
    } else {
        header_flags |= flags::PITCH;
    }
    if has_mips {
        header_flags |= flags::MIPMAPCOUNT;
    }
    if is_volume {
        header_flags |= flags::DEPTH;
    }

    let mut surface_caps = caps::TEXTURE;
    if has_mips || desc.shape != Shape::Texture2D {
        surface_caps |= caps::COMPLEX;
    }
    if has_mips {
        surface_caps |= caps::MIPMAP;
    }

    let surface_caps2 = match desc.shape {
        Shape::Texture2D => 0,
        Shape::Cubemap => caps2::CUBEMAP_ALL_FACES,
        Shape::Volume => caps2::VOLUME,
    };

    let header = DdsHeader {
        size: DdsHeader::SIZE,
        flags: header_flags,
        height: desc.height,
        width: desc.width,
        pitch_or_linear_size: pitch_or_linear_size(desc),
        depth: if is_volume { desc.depth } else { 0 },
        mipmap_count: desc.mip_count,
        reserved1: [0; 11],
        pixel_format: DdsPixelFormat::for_format(desc.format),
        caps: surface_caps,
        caps2: surface_caps2,
        caps3: 0,
        caps4: 0,
        reserved2: 0,
    };

    let mut out = [0u8; DDS_HEADER_LEN];
    out[..4].copy_from_slice(DDS_MAGIC);
    out[4..].copy_from_slice(header.as_bytes());
    out
}

fn pitch_or_linear_size(desc: &TextureDescriptor) -> u32 {
    match desc.format.block_bytes() {
        None => (desc.width * 32 + 7) / 8,
        Some(block_bytes) => {
            let blocks_x = desc.width.div_ceil(4).max(1);
            let blocks_y = desc.height.div_ceil(4).max(1);
            blocks_x * blocks_y * block_bytes
        }
    }
}
