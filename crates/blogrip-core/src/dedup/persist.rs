//! Persist the dedup store to disk (JSON) so handled files survive across runs.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::DedupStore;

impl DedupStore {
    /// Default path for the store: `~/.local/state/blogrip/dedup.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("blogrip")?;
        Ok(xdg_dirs.place_state_file("dedup.json")?)
    }

    /// Load the store from `path`. A missing file yields an empty store; an
    /// unreadable or corrupt file is an error (the state is not repaired).
    pub fn load(path: &Path) -> Result<DedupStore> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no dedup store at {}, starting empty", path.display());
                return Ok(DedupStore::new());
            }
            Err(e) => return Err(e).with_context(|| format!("read dedup store: {}", path.display())),
        };
        let store: DedupStore = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse dedup store: {}", path.display()))?;
        tracing::debug!(files = store.total(), "loaded dedup store from {}", path.display());
        Ok(store)
    }

    /// Overwrite `path` with the whole store (creates parent dir if needed).
    /// Written to a sibling temp file and renamed so a crash never leaves a torn file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(self).context("serialize dedup store")?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json)
            .with_context(|| format!("write dedup store: {}", tmp.display()))?;
        std::fs::rename(&tmp, path).with_context(|| {
            format!("rename {} to {}", tmp.display(), path.display())
        })?;
        Ok(())
    }
}
