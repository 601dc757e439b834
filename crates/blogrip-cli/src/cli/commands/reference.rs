//! `blogrip reference` – seed the dedup store from files on disk.

use anyhow::Result;
use blogrip_core::dedup::DedupStore;
use std::path::{Path, PathBuf};

pub fn run_reference(directory: &Path, dedup_file: Option<PathBuf>, recursive: bool) -> Result<()> {
    let path = super::dedup_path(dedup_file)?;
    let mut store = DedupStore::load(&path)?;
    let added = store.reference_directory(directory, recursive)?;
    store.save(&path)?;
    println!(
        "Referenced {} new file(s); {} recorded in {}",
        added,
        store.total(),
        path.display()
    );
    Ok(())
}
