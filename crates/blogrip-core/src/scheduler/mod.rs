//! Site scheduler.
//!
//! Walks sites in order and, per site, media kinds in order: paginates the
//! feed, turns each unit into a queued [`DownloadTask`] unless the dedup store
//! already knows its filename, then waits for the queue to drain before the
//! next (site, kind) pair starts. The scheduler thread is the only writer of
//! the [`DedupStore`].

mod endpoint;
mod paginate;
mod report;
mod session;

pub use endpoint::FeedEndpoint;
pub use report::{PairReport, PairStatus, RunSummary};
pub use session::{rip, RipRequest};

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::config::RipperConfig;
use crate::dedup::DedupStore;
use crate::downloader::MediaDownloader;
use crate::http::HttpClient;
use crate::media::MediaKind;
use crate::queue::TaskQueue;
use crate::resolver::UrlResolver;
use crate::retry::RetryPolicy;
use crate::sites;
use crate::worker::{DownloadStats, DownloadTask, WorkerPool};

pub struct Scheduler {
    endpoint: FeedEndpoint,
    http: HttpClient,
    resolver: UrlResolver,
    policy: RetryPolicy,
    page_size: u32,
    max_decode_retries: u32,
    store: DedupStore,
    queue: Arc<TaskQueue<DownloadTask>>,
    stats: Arc<DownloadStats>,
    pool: WorkerPool,
}

impl Scheduler {
    /// Builds the resolver and starts `cfg.workers` download workers sharing `http`.
    pub fn new(cfg: &RipperConfig, http: HttpClient, store: DedupStore) -> Result<Self> {
        let endpoint = FeedEndpoint::new(&cfg.feed_base_url)?;
        let resolver = UrlResolver::with_default_rules().context("compile url extraction rules")?;
        let policy = cfg.retry_policy();
        let queue = Arc::new(TaskQueue::new());
        let stats = Arc::new(DownloadStats::default());
        let downloader = Arc::new(MediaDownloader::new(http.clone(), policy));
        let pool = WorkerPool::start(
            cfg.workers,
            Arc::clone(&queue),
            downloader,
            Arc::clone(&stats),
        )
        .context("start download workers")?;
        Ok(Self {
            endpoint,
            http,
            resolver,
            policy,
            page_size: cfg.page_size,
            max_decode_retries: cfg.max_page_decode_retries,
            store,
            queue,
            stats,
            pool,
        })
    }

    /// Processes every site under `output_root` (one subdirectory per site).
    pub fn run(&mut self, output_root: &Path, site_list: &[String]) -> RunSummary {
        let mut summary = RunSummary::default();
        tracing::info!(
            sites = site_list.len(),
            workers = self.pool.size(),
            "starting run into {}",
            output_root.display()
        );
        for site in site_list {
            if sites::is_commented_out(site) {
                tracing::debug!("skipping commented-out site {}", site);
                continue;
            }
            if !sites::is_valid_site_name(site) {
                tracing::warn!("skipping invalid site name {:?}", site);
                summary.skipped_sites.push(site.clone());
                continue;
            }
            let target_dir = output_root.join(site);
            if let Err(e) = std::fs::create_dir_all(&target_dir) {
                tracing::error!(site = %site, "cannot create {}: {}", target_dir.display(), e);
                summary.skipped_sites.push(site.clone());
                continue;
            }
            for kind in MediaKind::ALL {
                summary.pairs.push(self.run_pair(site, kind, &target_dir));
            }
        }
        summary
    }

    /// Paginates one (site, kind) and blocks until its downloads have drained.
    pub fn run_pair(&mut self, site: &str, kind: MediaKind, target_dir: &Path) -> PairReport {
        let before = self.stats.snapshot();
        let mut report = self.paginate(site, kind, target_dir);
        self.queue.join();
        report.downloads = self.stats.snapshot().since(before);
        tracing::info!(
            site = %site,
            kind = %kind,
            enqueued = report.enqueued,
            failed = report.downloads.failed,
            "finished downloading all {}s from {} ({})",
            kind,
            site,
            report.status
        );
        report
    }

    pub fn store(&self) -> &DedupStore {
        &self.store
    }

    /// Hands back the store for saving. Workers keep running idle.
    pub fn into_store(self) -> DedupStore {
        self.store
    }
}
