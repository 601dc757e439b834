//! CLI command handlers, one file per subcommand.

mod index;
mod reference;
mod rip;

pub use index::run_index;
pub use reference::run_reference;
pub use rip::{run_rip, RipArgs};

use anyhow::Result;
use blogrip_core::dedup::DedupStore;
use std::path::PathBuf;

/// `-p` if given, else the default state path.
fn dedup_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => DedupStore::default_path(),
    }
}
