//! Recursive directory sizing.
//!
//! The size of a directory is the sum of the byte lengths of every regular file beneath it.
//! A symlinked root is resolved; symlinks below it are not followed. Entries that cannot be
//! read part way through the walk are skipped, the same way `du` reports a partial total.

use crate::files::io_error;
use crate::FilesResult;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Computes subtree sizes by walking the directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkDirSizer;

impl WalkDirSizer {
    pub fn new() -> Self {
        Self
    }

    /// Returns the total size in bytes of all regular files under `path`.
    ///
    /// A regular file yields its own length. `path` itself is resolved through symlinks, so a
    /// link to a directory is sized as that directory.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::NotFound` if `path` does not exist, or `FilesError::Io` if its
    /// metadata cannot be read.
    pub fn recursive_size(&self, path: &Path) -> FilesResult<u64> {
        let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;
        if !metadata.is_dir() {
            return Ok(metadata.len());
        }

        let mut total: u64 = 0;
        for entry in WalkDir::new(path).follow_root_links(true).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("skipping unreadable entry under {}: {}", path.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            match entry.metadata() {
                Ok(meta) => total = total.saturating_add(meta.len()),
                Err(e) => {
                    tracing::debug!("skipping {}: {}", entry.path().display(), e);
                }
            }
        }

        Ok(total)
    }
}
