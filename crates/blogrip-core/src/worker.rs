//! Fixed pool of download workers fed by the [`TaskQueue`].
//!
//! Workers are plain named threads running [`worker_loop`]; they are started
//! once per run and never stopped (they exit with the process).

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crate::downloader::{DownloadOutcome, MediaDownloader};
use crate::feed::FeedRecord;
use crate::media::MediaKind;
use crate::queue::TaskQueue;

/// One accepted download unit. Immutable once queued.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub site: String,
    pub kind: MediaKind,
    /// Source record, kept for diagnostics.
    pub record: FeedRecord,
    pub target_dir: PathBuf,
    /// URL resolved by the scheduler from `record`.
    pub url: String,
}

/// Outcome counters shared by all workers.
#[derive(Debug, Default)]
pub struct DownloadStats {
    downloaded: AtomicU64,
    already_present: AtomicU64,
    failed: AtomicU64,
    bytes: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub downloaded: u64,
    pub already_present: u64,
    pub failed: u64,
    pub bytes: u64,
}

impl StatsSnapshot {
    /// Counts accumulated since `earlier`.
    pub fn since(self, earlier: StatsSnapshot) -> StatsSnapshot {
        StatsSnapshot {
            downloaded: self.downloaded.saturating_sub(earlier.downloaded),
            already_present: self.already_present.saturating_sub(earlier.already_present),
            failed: self.failed.saturating_sub(earlier.failed),
            bytes: self.bytes.saturating_sub(earlier.bytes),
        }
    }
}

impl DownloadStats {
    pub fn record(&self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded { bytes, .. } => {
                self.downloaded.fetch_add(1, Ordering::Relaxed);
                self.bytes.fetch_add(*bytes, Ordering::Relaxed);
            }
            DownloadOutcome::AlreadyPresent => {
                self.already_present.fetch_add(1, Ordering::Relaxed);
            }
            DownloadOutcome::Failed { .. } => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            downloaded: self.downloaded.load(Ordering::Relaxed),
            already_present: self.already_present.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
        }
    }
}

/// Marks the taken task done when dropped.
struct TaskDoneGuard<'a> {
    queue: &'a TaskQueue<DownloadTask>,
}

impl Drop for TaskDoneGuard<'_> {
    fn drop(&mut self) {
        self.queue.task_done();
    }
}

/// Anything that can execute one task. Implemented by [`MediaDownloader`].
pub trait TaskRunner: Send + Sync + 'static {
    fn run(&self, task: &DownloadTask) -> DownloadOutcome;
}

impl TaskRunner for MediaDownloader {
    fn run(&self, task: &DownloadTask) -> DownloadOutcome {
        self.download(task.kind, &task.url, &task.target_dir)
    }
}

/// Take, run, mark done, forever. A panicking task counts as failed and the
/// worker moves on to the next one.
pub fn worker_loop<R: TaskRunner + ?Sized>(
    queue: &TaskQueue<DownloadTask>,
    runner: &R,
    stats: &DownloadStats,
) {
    loop {
        let task = queue.take();
        let _done = TaskDoneGuard { queue };
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| runner.run(&task)))
            .unwrap_or_else(|payload| DownloadOutcome::Failed {
                reason: format!("worker panicked: {}", panic_message(payload.as_ref())),
                attempts: 0,
            });
        match &outcome {
            DownloadOutcome::Failed { reason, attempts } => {
                tracing::warn!(
                    site = %task.site,
                    kind = %task.kind,
                    url = %task.url,
                    attempts,
                    "failed to download: {}",
                    reason
                );
                tracing::debug!(site = %task.site, "failed record: {}", task.record);
            }
            DownloadOutcome::Downloaded { .. } | DownloadOutcome::AlreadyPresent => {}
        }
        stats.record(&outcome);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    /// Spawns `size` detached workers named `blogrip-worker-<n>`.
    pub fn start<R: TaskRunner>(
        size: usize,
        queue: Arc<TaskQueue<DownloadTask>>,
        runner: Arc<R>,
        stats: Arc<DownloadStats>,
    ) -> io::Result<Self> {
        for n in 0..size {
            let queue = Arc::clone(&queue);
            let runner = Arc::clone(&runner);
            let stats = Arc::clone(&stats);
            thread::Builder::new()
                .name(format!("blogrip-worker-{}", n))
                .spawn(move || worker_loop(&queue, runner.as_ref(), &stats))?;
        }
        tracing::debug!(size, "worker pool started");
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Element;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    struct Scripted {
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    impl TaskRunner for Scripted {
        fn run(&self, task: &DownloadTask) -> DownloadOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(task.url.clone());
            if task.url.ends_with("bad") {
                DownloadOutcome::Failed {
                    reason: "HTTP 403".to_string(),
                    attempts: 1,
                }
            } else if task.url.ends_with("boom") {
                panic!("runner panicked");
            } else {
                DownloadOutcome::Downloaded {
                    bytes: 10,
                    attempts: 1,
                }
            }
        }
    }

    fn task(url: &str) -> DownloadTask {
        DownloadTask {
            site: "demo".to_string(),
            kind: MediaKind::Photo,
            record: FeedRecord::new(Element::default()),
            target_dir: PathBuf::from("/unused"),
            url: url.to_string(),
        }
    }

    #[test]
    fn pool_drains_queue_and_tallies() {
        let queue = Arc::new(TaskQueue::new());
        let runner = Arc::new(Scripted {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        });
        let stats = Arc::new(DownloadStats::default());
        let pool = WorkerPool::start(3, Arc::clone(&queue), Arc::clone(&runner), Arc::clone(&stats)).unwrap();
        assert_eq!(pool.size(), 3);

        let before = stats.snapshot();
        for url in ["a", "b", "c/bad", "d"] {
            queue.put(task(url));
        }
        queue.join();

        assert_eq!(runner.calls.load(Ordering::SeqCst), 4);
        let delta = stats.snapshot().since(before);
        assert_eq!(delta.downloaded, 3);
        assert_eq!(delta.failed, 1);
        assert_eq!(delta.bytes, 30);
    }

    #[test]
    fn panicking_task_counts_as_failed_and_worker_survives() {
        let queue = Arc::new(TaskQueue::new());
        let runner = Arc::new(Scripted {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        });
        let stats = Arc::new(DownloadStats::default());
        // A single worker: it must outlive the panic to run "y".
        WorkerPool::start(1, Arc::clone(&queue), Arc::clone(&runner), Arc::clone(&stats)).unwrap();
        queue.put(task("x/boom"));
        queue.put(task("y"));
        queue.join();
        assert!(runner.seen.lock().unwrap().contains(&"y".to_string()));
        let snap = stats.snapshot();
        assert_eq!(snap.failed, 1);
        assert_eq!(snap.downloaded, 1);
    }
}
