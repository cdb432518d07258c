//! Loading the attraction catalog from a JSON file.

use std::io::{self, BufReader};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use tourguide_core::Attraction;

use crate::CliError;

/// Open a UTF-8 file path using ambient authority.
fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Load a JSON array of attractions.
///
/// Each entry carries an `id`, a `name`, and a `location` object with
/// `latitude` and `longitude` in degrees.
pub(crate) fn load_catalog(path: &Utf8Path) -> Result<Vec<Attraction>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseCatalog {
        path: path.to_path_buf(),
        source,
    })
}
