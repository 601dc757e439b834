//! Per-pair and per-run reporting.

use std::fmt;

use crate::media::MediaKind;
use crate::worker::StatsSnapshot;

/// How pagination of one (site, kind) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStatus {
    /// Feed returned no more records.
    Exhausted,
    /// Feed endpoint answered 404.
    SiteMissing,
    /// Page fetch or decode retries ran out.
    Abandoned,
}

impl fmt::Display for PairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PairStatus::Exhausted => "done",
            PairStatus::SiteMissing => "site missing",
            PairStatus::Abandoned => "abandoned",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairReport {
    pub site: String,
    pub kind: MediaKind,
    pub status: PairStatus,
    /// Page responses received (including the final empty or 404 page).
    pub pages: u32,
    /// New units queued for download.
    pub enqueued: u64,
    /// Units skipped because the dedup store already had them.
    pub known: u64,
    /// Units with no usable URL or filename.
    pub unresolvable: u64,
    /// Worker outcomes between the first page and the drain barrier.
    pub downloads: StatsSnapshot,
}

impl PairReport {
    pub fn new(site: &str, kind: MediaKind) -> Self {
        Self {
            site: site.to_string(),
            kind,
            status: PairStatus::Exhausted,
            pages: 0,
            enqueued: 0,
            known: 0,
            unresolvable: 0,
            downloads: StatsSnapshot::default(),
        }
    }
}

impl fmt::Display for PairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}s: {} ({} queued, {} known, {} unresolvable; {} downloaded, {} on disk, {} failed)",
            self.site,
            self.kind,
            self.status,
            self.enqueued,
            self.known,
            self.unresolvable,
            self.downloads.downloaded,
            self.downloads.already_present,
            self.downloads.failed,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pairs: Vec<PairReport>,
    /// Sites rejected before any request (invalid name or directory error).
    pub skipped_sites: Vec<String>,
}

impl RunSummary {
    pub fn enqueued(&self) -> u64 {
        self.pairs.iter().map(|p| p.enqueued).sum()
    }

    pub fn totals(&self) -> StatsSnapshot {
        self.pairs.iter().fold(StatsSnapshot::default(), |acc, p| StatsSnapshot {
            downloaded: acc.downloaded + p.downloads.downloaded,
            already_present: acc.already_present + p.downloads.already_present,
            failed: acc.failed + p.downloads.failed,
            bytes: acc.bytes + p.downloads.bytes,
        })
    }

    pub fn pair(&self, site: &str, kind: MediaKind) -> Option<&PairReport> {
        self.pairs.iter().find(|p| p.site == site && p.kind == kind)
    }
}
