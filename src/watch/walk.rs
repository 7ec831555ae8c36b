// src/watch/walk.rs

//! Directory enumeration for building the initial watch set.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::fs::FileSystem;

/// Return `root` and every directory beneath it, sorted.
///
/// Symlinked directories are listed as entries of their parent but are not
/// descended into, so link cycles can't make this loop forever.
pub fn list_directories(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs.read_dir(&dir)? {
            if fs.is_dir(&entry) && !fs.is_symlink(&entry) {
                pending.push(entry);
            }
        }
        found.push(dir);
    }

    found.sort();
    Ok(found)
}
