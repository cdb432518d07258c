//! Test helpers for writing attraction catalogs to disk.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use tourguide_core::{Attraction, GeoPoint};
use uuid::Uuid;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write file");
}

/// A catalog file inside a temporary directory that lives as long as the
/// value.
pub(super) struct CatalogFile {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl CatalogFile {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            _dir: dir,
            path: root.join("attractions.json"),
        }
    }

    /// A catalog with attractions scattered over the globe so random
    /// visits have a chance of landing near one of them.
    pub(super) fn with_sample_attractions() -> Self {
        let file = Self::new();
        file.write(&sample_attractions());
        file
    }

    pub(super) fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub(super) fn write(&self, attractions: &[Attraction]) {
        let payload = serde_json::to_vec_pretty(attractions).expect("serialise catalog");
        write_utf8(&self.path, &payload);
    }
}

pub(super) fn sample_attractions() -> Vec<Attraction> {
    [
        ("Disneyland", 33.817_595, -117.922_008),
        ("Jackson Hole", 43.582_767, -110.821_999),
        ("Mojave National Preserve", 35.141_689, -115.510_399),
        ("Joshua Tree National Park", 33.881_866, -115.900_65),
        ("Buffalo National River", 35.985_512, -92.757_652),
    ]
    .into_iter()
    .map(|(name, latitude, longitude)| {
        Attraction::new(Uuid::new_v4(), name, GeoPoint::new(latitude, longitude))
    })
    .collect()
}
