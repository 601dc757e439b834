//! Dedup store: target directory → filenames already handled.
//!
//! A filename is recorded when its task is accepted into the queue, not when
//! the download finishes, so in-flight and failed downloads are never
//! re-enqueued. The store is loaded once at startup, mutated only by the
//! scheduler thread, and saved once after every site has been processed.

mod persist;
mod reference;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Filenames recorded for one target directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub files: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupStore {
    dirs: BTreeMap<PathBuf, DirEntry>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `filename` was already handled in `dir`.
    pub fn has(&self, dir: &Path, filename: &str) -> bool {
        self.dirs
            .get(dir)
            .is_some_and(|entry| entry.files.contains(filename))
    }

    /// Records `filename` under `dir`. Returns false if it was already present.
    pub fn add(&mut self, dir: &Path, filename: &str) -> bool {
        self.dirs
            .entry(dir.to_path_buf())
            .or_default()
            .files
            .insert(filename.to_string())
    }

    /// Number of filenames recorded for `dir`.
    pub fn count(&self, dir: &Path) -> usize {
        self.dirs.get(dir).map_or(0, |entry| entry.files.len())
    }

    /// Total filenames across all directories.
    pub fn total(&self) -> usize {
        self.dirs.values().map(|entry| entry.files.len()).sum()
    }

    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.dirs.keys().map(PathBuf::as_path)
    }

    pub fn files_in(&self, dir: &Path) -> impl Iterator<Item = &str> {
        self.dirs
            .get(dir)
            .into_iter()
            .flat_map(|entry| entry.files.iter().map(String::as_str))
    }
}
