//! `blogrip index` – write browsable index pages.

use anyhow::Result;
use blogrip_core::index::build_index;
use std::path::Path;

pub fn run_index(directory: &Path, recursive: bool) -> Result<()> {
    let written = build_index(directory, recursive)?;
    if written.is_empty() {
        println!("No media found under {}.", directory.display());
    }
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
