//! File I/O — loading a file as text and saving it atomically.
//!
//! Saves go to a temporary file in the destination's directory, which is
//! then renamed over the target. A crash mid-write leaves the old file
//! intact.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Read `path` as text. Invalid UTF-8 is replaced, not rejected.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Any I/O error other than `NotFound`.
pub fn read_text(path: &Path) -> io::Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Replace the contents of `path` with `data`, returning the byte count.
///
/// The permissions of an existing file are carried over.
///
/// # Errors
///
/// Creating, writing, syncing or renaming the temporary file failed.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<usize> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(data.len())
}
