//! Reading patch files from a directory.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;

/// Whether a file name carries the `.syx` extension, ignoring case
pub fn is_syx(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".syx")
}

/// Reads every `.syx` file directly inside `dir`, sorted by file name.
///
/// Returns `(file_name, bytes)` pairs. Subdirectories are not descended
/// into. Any read failure is returned as [`crate::Error::Io`]. Names that
/// are not valid UTF-8 are returned with replacement characters.
pub fn read_syx_files(dir: impl AsRef<Path>) -> Result<Vec<(String, Vec<u8>)>> {
    let dir = dir.as_ref();

    let mut entries: Vec<(OsString, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        if is_syx(&file_name.to_string_lossy()) {
            entries.push((file_name, entry.path()));
        }
    }
    entries.sort();

    let mut files = Vec::with_capacity(entries.len());
    for (file_name, path) in entries {
        let name = file_name.to_string_lossy().into_owned();
        let data = fs::read(&path)?;
        debug!("scan: read {} ({} bytes)", name, data.len());
        files.push((name, data));
    }

    Ok(files)
}
