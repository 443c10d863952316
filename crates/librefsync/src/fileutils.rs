//! Small file-system helpers shared by the reconcilers.

use std::{fs, io::ErrorKind, path::Path};

use tracing::debug;

use crate::error::Result;

/// Write `contents` to `path` unless the file already holds exactly those bytes.
///
/// Returns `true` when the file was written. A file that is already up to date is left alone so
/// its modification time survives for incremental builds downstream.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<bool> {
    match fs::read(path) {
        Ok(existing) if existing == contents.as_bytes() => {
            debug!("Unchanged: {}", path.display());
            return Ok(false);
        }
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    fs::write(path, contents)?;
    Ok(true)
}
