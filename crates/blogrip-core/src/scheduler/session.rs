//! One complete rip: startup checks, scheduling, single save of the dedup store.

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::report::RunSummary;
use super::Scheduler;
use crate::config::RipperConfig;
use crate::dedup::DedupStore;
use crate::http::HttpClient;
use crate::proxy::ProxyConfig;

/// Inputs for [`rip`], already validated by the caller.
#[derive(Debug, Clone)]
pub struct RipRequest {
    pub sites: Vec<String>,
    /// Existing directory; each site gets a subdirectory.
    pub output_root: PathBuf,
    pub dedup_path: PathBuf,
    pub proxy: Option<ProxyConfig>,
}

/// Runs every site and saves the dedup store once at the end.
///
/// Fails before any request if the output root is missing or the dedup file
/// is unreadable. Per-site and per-item failures are logged and reported in
/// the summary, never returned as errors.
pub fn rip(cfg: &RipperConfig, request: &RipRequest) -> Result<RunSummary> {
    cfg.validate()?;
    let output_root = request
        .output_root
        .canonicalize()
        .with_context(|| format!("output directory: {}", request.output_root.display()))?;
    if !output_root.is_dir() {
        anyhow::bail!("output path is not a directory: {}", output_root.display());
    }
    let store = DedupStore::load(&request.dedup_path)?;

    let http = HttpClient::new(cfg.request_timeout())
        .with_proxy(request.proxy.clone())
        .with_user_agent(cfg.user_agent.clone());
    let mut scheduler = Scheduler::new(cfg, http, store)?;
    let summary = scheduler.run(&output_root, &request.sites);

    let store = scheduler.into_store();
    store
        .save(&request.dedup_path)
        .with_context(|| format!("save dedup store: {}", request.dedup_path.display()))?;
    tracing::info!(
        files = store.total(),
        "dedup store saved to {}",
        request.dedup_path.display()
    );
    Ok(summary)
}
