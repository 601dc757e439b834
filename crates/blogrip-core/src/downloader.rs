//! Single media download with bounded retry.
//!
//! The body is streamed into `<name>.part` and renamed into place on success,
//! so the final name only ever refers to a complete file. Failures never
//! escape as errors: every call resolves to a [`DownloadOutcome`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::http::{FetchError, HttpClient};
use crate::media::MediaKind;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::url_model::derive_media_filename;

/// Suffix of the in-progress file next to the final name.
const PART_SUFFIX: &str = ".part";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// File written; `attempts` counts the request that succeeded.
    Downloaded { bytes: u64, attempts: u32 },
    /// A file with the derived name already exists; no request made.
    AlreadyPresent,
    /// Gave up; nothing left on disk.
    Failed { reason: String, attempts: u32 },
}

pub struct MediaDownloader {
    http: HttpClient,
    policy: RetryPolicy,
}

impl MediaDownloader {
    pub fn new(http: HttpClient, policy: RetryPolicy) -> Self {
        Self { http, policy }
    }

    pub fn download(&self, kind: MediaKind, url: &str, target_dir: &Path) -> DownloadOutcome {
        let Some(name) = derive_media_filename(kind, url) else {
            return DownloadOutcome::Failed {
                reason: format!("no filename in {} url", kind),
                attempts: 0,
            };
        };
        let final_path = target_dir.join(&name);
        if final_path.exists() {
            tracing::debug!(%kind, url, "already on disk: {}", final_path.display());
            return DownloadOutcome::AlreadyPresent;
        }
        let part_path = part_path_for(target_dir, &name);

        let mut attempts = 0u32;
        let result = run_with_retry(&self.policy, || {
            attempts += 1;
            self.http.download_to(url, &part_path)
        })
        .and_then(|bytes| {
            fs::rename(&part_path, &final_path)
                .map(|()| bytes)
                .map_err(FetchError::Storage)
        });

        match result {
            Ok(bytes) => {
                tracing::debug!(%kind, url, bytes, attempts, "saved {}", final_path.display());
                DownloadOutcome::Downloaded { bytes, attempts }
            }
            Err(e) => {
                // May not exist if the first attempt failed before creating it.
                let _ = fs::remove_file(&part_path);
                DownloadOutcome::Failed {
                    reason: e.to_string(),
                    attempts,
                }
            }
        }
    }
}

fn part_path_for(target_dir: &Path, name: &str) -> PathBuf {
    target_dir.join(format!("{}{}", name, PART_SUFFIX))
}
