//! Seed the store from media files already on disk.

use anyhow::{Context, Result};
use std::path::Path;
use walkdir::WalkDir;

use super::DedupStore;
use crate::media::is_media_file;

impl DedupStore {
    /// Records every media file under `root` against its containing directory.
    /// Without `recursive` only files directly in `root` are considered.
    /// Returns the number of filenames that were not yet recorded.
    pub fn reference_directory(&mut self, root: &Path, recursive: bool) -> Result<usize> {
        let root = root
            .canonicalize()
            .with_context(|| format!("reference directory: {}", root.display()))?;
        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut added = 0;
        for entry in WalkDir::new(&root).min_depth(1).max_depth(max_depth) {
            let entry = entry.with_context(|| format!("walk {}", root.display()))?;
            if !entry.file_type().is_file() || !is_media_file(entry.path()) {
                continue;
            }
            let (Some(dir), Some(name)) = (
                entry.path().parent(),
                entry.file_name().to_str(),
            ) else {
                tracing::warn!("skipping non UTF-8 filename {}", entry.path().display());
                continue;
            };
            if self.add(dir, name) {
                added += 1;
            }
        }
        tracing::info!(added, recursive, "referenced existing files under {}", root.display());
        Ok(added)
    }
}
