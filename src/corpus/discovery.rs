//! Image discovery in directories.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extensions accepted as encoder input, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Whether a path has a supported image extension.
#[must_use]
pub fn is_candidate(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// List candidate images directly inside `path`, sorted by path.
///
/// Subdirectories are not scanned.
pub fn discover_images(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(Error::InputDirNotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_dir() {
        return Err(Error::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    let mut images = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry_path = entry?.path();
        if entry_path.is_file() && is_candidate(&entry_path) {
            images.push(entry_path);
        }
    }

    if images.is_empty() {
        return Err(Error::NoImages {
            path: path.to_path_buf(),
        });
    }

    images.sort();
    Ok(images)
}
