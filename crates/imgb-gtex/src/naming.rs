//! File naming for extracted images.
//!
//! A container `foo.txbh` extracts to `foo.dds`, `foo_cbmap_1.dds` ..
//! `foo_cbmap_6.dds`, or `foo_volume.dds`, all in one directory.

use std::path::{Path, PathBuf};

use crate::format::Topology;
use crate::{Error, Result};

pub const CUBEMAP_SUFFIX: &str = "_cbmap";
pub const VOLUME_SUFFIX: &str = "_volume";

/// Base name used for every image extracted from a header block.
pub fn container_name(header_path: &Path) -> String {
    header_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<dir>/<name>.dds`
pub fn classic_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.dds"))
}

/// Single-file image for a topology: `<name>.dds`, `<name>_cbmap.dds`
/// or `<name>_volume.dds`.
pub fn combined_path(dir: &Path, name: &str, topology: Topology) -> PathBuf {
    match topology.base() {
        Topology::Cubemap => dir.join(format!("{name}{CUBEMAP_SUFFIX}.dds")),
        Topology::Volume => dir.join(format!("{name}{VOLUME_SUFFIX}.dds")),
        _ => classic_path(dir, name),
    }
}

/// One face or slice: `<name>_cbmap_<index>.dds` / `<name>_volume_<index>.dds`.
///
/// Indices are 1-based.
pub fn sibling_path(dir: &Path, name: &str, topology: Topology, index: usize) -> PathBuf {
    let suffix = match topology.base() {
        Topology::Volume => VOLUME_SUFFIX,
        _ => CUBEMAP_SUFFIX,
    };
    dir.join(format!("{name}{suffix}_{index}.dds"))
}

/// All `count` sibling paths, in index order.
pub fn sibling_paths(dir: &Path, name: &str, topology: Topology, count: usize) -> Vec<PathBuf> {
    (1..=count)
        .map(|index| sibling_path(dir, name, topology, index))
        .collect()
}

/// Fail with the first path that does not exist.
pub fn require_all(paths: &[PathBuf]) -> Result<()> {
    match paths.iter().find(|path| !path.is_file()) {
        Some(missing) => Err(Error::MissingSiblingFile(missing.clone())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_name() {
        assert_eq!(container_name(Path::new("/data/chr/c001.txbh")), "c001");
        assert_eq!(container_name(Path::new("sky_box")), "sky_box");
    }

    #[test]
    fn test_paths() {
        let dir = Path::new("out");
        assert_eq!(classic_path(dir, "tex"), Path::new("out/tex.dds"));
        assert_eq!(
            combined_path(dir, "tex", Topology::ConsoleCubemap),
            Path::new("out/tex_cbmap.dds")
        );
        assert_eq!(
            combined_path(dir, "tex", Topology::Volume),
            Path::new("out/tex_volume.dds")
        );
        assert_eq!(
            combined_path(dir, "tex", Topology::ConsoleClassic),
            Path::new("out/tex.dds")
        );

        let faces = sibling_paths(dir, "tex", Topology::Cubemap, 6);
        assert_eq!(faces.len(), 6);
        assert_eq!(faces[0], Path::new("out/tex_cbmap_1.dds"));
        assert_eq!(faces[5], Path::new("out/tex_cbmap_6.dds"));
        assert_eq!(
            sibling_path(dir, "tex", Topology::Volume, 3),
            Path::new("out/tex_volume_3.dds")
        );
    }

    #[test]
    fn test_require_all_names_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = sibling_paths(dir.path(), "tex", Topology::Cubemap, 3);
        std::fs::write(&paths[0], b"x").unwrap();
        std::fs::write(&paths[2], b"x").unwrap();

        match require_all(&paths) {
            Err(Error::MissingSiblingFile(path)) => assert_eq!(path, paths[1]),
            other => panic!("unexpected {other:?}"),
        }

        std::fs::write(&paths[1], b"x").unwrap();
        assert!(require_all(&paths).is_ok());
    }
}
