//! Staged image writes.
//!
//! A figure is drawn into a hidden sibling file and renamed over the final
//! path only after the backend has flushed it, so a failed render leaves no
//! partial image behind.

use std::error::Error as StdError;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// `dir/.stem.partial.png` for `dir/stem.png`. Keeps the extension so the
/// bitmap backend still picks the right encoder.
pub fn staging_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!(".{stem}.partial.{}", ext.to_string_lossy()),
        None => format!(".{stem}.partial"),
    };
    path.with_file_name(name)
}

/// Run `draw` against a staging file, then move it to `path`.
pub fn write_staged<F>(path: &Path, draw: F) -> Result<()>
where
    F: FnOnce(&Path) -> std::result::Result<(), Box<dyn StdError>>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
    }

    let staging = staging_path(path);
    if let Err(err) = draw(&staging) {
        let _ = fs::remove_file(&staging);
        return Err(Error::Draw {
            path: path.to_path_buf(),
            message: err.to_string(),
        });
    }

    fs::rename(&staging, path).map_err(|e| {
        let _ = fs::remove_file(&staging);
        Error::write(path, e)
    })
}
