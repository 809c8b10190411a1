//! Replacement images on disk.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use imgb_dds::{DdsImage, Shape, TextureDescriptor};

use crate::format::Topology;
use crate::naming;
use crate::{Error, Result};

/// How a container's replacement pixels are laid out across files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    /// `<name>.dds`
    Classic,
    /// `<name>_cbmap_1.dds` .. `<name>_cbmap_6.dds`
    SplitCube,
    /// `<name>_cbmap.dds`, all six faces back to back
    CombinedCube,
    /// `<name>_volume.dds`
    CombinedVolume,
    /// `<name>_volume_1.dds` .. `<name>_volume_<depth>.dds`
    SlicedVolume,
}

impl Layout {
    pub fn topology(self) -> Topology {
        match self {
            Self::Classic => Topology::Classic,
            Self::SplitCube | Self::CombinedCube => Topology::Cubemap,
            Self::CombinedVolume | Self::SlicedVolume => Topology::Volume,
        }
    }
}

/// Every image feeding one container, opened and parsed up front.
#[derive(Debug)]
pub(crate) struct Source {
    pub layout: Layout,
    images: Vec<(PathBuf, DdsImage)>,
}

impl Source {
    /// Find the images for a container whose topology is already known.
    ///
    /// Split cubemap faces win over a combined cubemap; a combined volume
    /// wins over slices. `depth` is the slice count to look for.
    pub fn for_topology(dir: &Path, name: &str, topology: Topology, depth: u16) -> Result<Self> {
        match topology.base() {
            Topology::Cubemap => {
                let faces = naming::sibling_paths(dir, name, topology, Topology::CUBE_FACES);
                let combined = naming::combined_path(dir, name, topology);
                if !faces[0].is_file() && combined.is_file() {
                    return Self::load(Layout::CombinedCube, vec![combined]);
                }
                Self::load(Layout::SplitCube, faces)
            }
            Topology::Volume => {
                let combined = naming::combined_path(dir, name, topology);
                if combined.is_file() {
                    return Self::load(Layout::CombinedVolume, vec![combined]);
                }
                let slices = naming::sibling_paths(dir, name, topology, usize::from(depth.max(1)));
                Self::load(Layout::SlicedVolume, slices)
            }
            _ => Self::load(Layout::Classic, vec![naming::classic_path(dir, name)]),
        }
    }

    /// Find whichever images exist for a container, deriving the topology
    /// from the file names.
    ///
    /// Probe order: `<name>.dds`, cubemap faces, combined cubemap, combined
    /// volume, volume slices (counted until the first gap).
    pub fn discover(dir: &Path, name: &str) -> Result<Self> {
        let classic = naming::classic_path(dir, name);
        if classic.is_file() {
            return Self::load(Layout::Classic, vec![classic]);
        }

        let first_face = naming::sibling_path(dir, name, Topology::Cubemap, 1);
        if first_face.is_file() {
            let faces = naming::sibling_paths(dir, name, Topology::Cubemap, Topology::CUBE_FACES);
            return Self::load(Layout::SplitCube, faces);
        }

        let cube = naming::combined_path(dir, name, Topology::Cubemap);
        if cube.is_file() {
            return Self::load(Layout::CombinedCube, vec![cube]);
        }

        let volume = naming::combined_path(dir, name, Topology::Volume);
        if volume.is_file() {
            return Self::load(Layout::CombinedVolume, vec![volume]);
        }

        let slices: Vec<PathBuf> = (1..=usize::from(u16::MAX))
            .map(|index| naming::sibling_path(dir, name, Topology::Volume, index))
            .take_while(|path| path.is_file())
            .collect();
        if !slices.is_empty() {
            return Self::load(Layout::SlicedVolume, slices);
        }

        Err(Error::MissingSiblingFile(classic))
    }

    fn load(layout: Layout, paths: Vec<PathBuf>) -> Result<Self> {
        naming::require_all(&paths)?;

        let mut images = Vec::with_capacity(paths.len());
        for path in paths {
            let image = open_image(&path)?;
            images.push((path, image));
        }

        let source = Self { layout, images };
        source.check_siblings_agree()?;
        Ok(source)
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.images.iter().map(|(path, _)| path.clone()).collect()
    }

    pub fn images(&self) -> impl Iterator<Item = (&Path, &TextureDescriptor)> {
        self.images
            .iter()
            .map(|(path, image)| (path.as_path(), &image.descriptor))
    }

    fn first(&self) -> (&Path, &DdsImage) {
        let (path, image) = &self.images[0];
        (path.as_path(), image)
    }

    /// Descriptor of one cubemap face, of the whole volume, or of the
    /// classic image.
    pub fn descriptor(&self) -> TextureDescriptor {
        let (_, first) = self.first();
        let desc = first.descriptor;
        match self.layout {
            Layout::Classic | Layout::SplitCube | Layout::CombinedCube => TextureDescriptor {
                shape: Shape::Texture2D,
                depth: 1,
                ..desc
            },
            Layout::CombinedVolume => TextureDescriptor { shape: Shape::Volume, ..desc },
            Layout::SlicedVolume => TextureDescriptor {
                shape: Shape::Volume,
                depth: self.images.len() as u32,
                ..desc
            },
        }
    }

    /// Payload per face for cubemaps, per slice for sliced volumes, or the
    /// single payload otherwise.
    ///
    /// A combined cubemap is cut into six runs of `face_len` bytes.
    pub fn payloads(&self, face_len: usize) -> Result<Vec<&[u8]>> {
        if self.layout != Layout::CombinedCube {
            return Ok(self.images.iter().map(|(_, image)| image.payload()).collect());
        }

        let (path, image) = self.first();
        let payload = image.payload();
        let needed = face_len * Topology::CUBE_FACES;
        if payload.len() < needed {
            return Err(Error::malformed(
                path,
                format!("holds {} pixel bytes, six faces need {needed}", payload.len()),
            ));
        }
        Ok(payload[..needed].chunks(face_len.max(1)).collect())
    }

    /// Volume pixels: the combined payload, or `slice_len` bytes from each
    /// slice in order.
    pub fn volume_pixels(&self, slice_len: usize) -> Result<Cow<'_, [u8]>> {
        if self.layout != Layout::SlicedVolume {
            let (_, image) = self.first();
            return Ok(Cow::Borrowed(image.payload()));
        }

        let mut pixels = Vec::with_capacity(slice_len * self.images.len());
        for (path, image) in &self.images {
            let payload = image.payload();
            let slice = payload.get(..slice_len).ok_or_else(|| {
                Error::malformed(
                    path,
                    format!("holds {} pixel bytes, slice needs {slice_len}", payload.len()),
                )
            })?;
            pixels.extend_from_slice(slice);
        }
        Ok(Cow::Owned(pixels))
    }

    /// Split faces and slices must describe the same texture.
    fn check_siblings_agree(&self) -> Result<()> {
        let (_, first) = self.first();
        let reference = first.descriptor;
        for (path, image) in self.images.iter().skip(1) {
            let desc = &image.descriptor;
            expect_field(path, "width", reference.width, desc.width)?;
            expect_field(path, "height", reference.height, desc.height)?;
            expect_field(path, "mip count", reference.mip_count, desc.mip_count)?;
            if desc.format != reference.format {
                return Err(Error::malformed(
                    path,
                    format!("is {:?}, sibling images are {:?}", desc.format, reference.format),
                ));
            }
        }
        Ok(())
    }
}

/// Open a replacement DDS, reporting anything but I/O failure as malformed.
pub(crate) fn open_image(path: &Path) -> Result<DdsImage> {
    DdsImage::open(path).map_err(|err| match err {
        imgb_dds::Error::Io(io) => Error::Io(io),
        other => Error::malformed(path, other),
    })
}

pub(crate) fn expect_field(
    path: &Path,
    field: &'static str,
    expected: u32,
    actual: u32,
) -> Result<()> {
    if expected != actual {
        return Err(Error::DescriptorMismatch {
            path: path.to_path_buf(),
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Cut a payload into consecutive mips of the given sizes.
pub(crate) fn split_mips<'a>(
    path: &Path,
    payload: &'a [u8],
    sizes: &[usize],
) -> Result<Vec<&'a [u8]>> {
    let needed: usize = sizes.iter().sum();
    if payload.len() < needed {
        return Err(Error::malformed(
            path,
            format!("holds {} pixel bytes, mip chain needs {needed}", payload.len()),
        ));
    }

    let mut mips = Vec::with_capacity(sizes.len());
    let mut offset = 0;
    for &size in sizes {
        mips.push(&payload[offset..offset + size]);
        offset += size;
    }
    Ok(mips)
}
