//! Pagination state machine for one (site, kind).

use std::path::Path;

use super::report::{PairReport, PairStatus};
use super::Scheduler;
use crate::feed::{parse_page, FeedPage, FeedRecord};
use crate::http::{is_success, FetchError, HttpResponse};
use crate::media::MediaKind;
use crate::retry::run_with_retry;
use crate::url_model::derive_media_filename;
use crate::worker::DownloadTask;

/// Status that means the site does not exist; surfaced, not retried.
const SITE_MISSING_STATUS: u32 = 404;

impl Scheduler {
    pub(super) fn paginate(&mut self, site: &str, kind: MediaKind, target_dir: &Path) -> PairReport {
        let mut report = PairReport::new(site, kind);
        let mut cursor: u64 = 0;
        let mut decode_failures: u32 = 0;
        loop {
            let url = match self.endpoint.page_url(site, kind, self.page_size, cursor) {
                Ok(url) => url,
                Err(e) => {
                    tracing::error!(site, %kind, "{:#}", e);
                    report.status = PairStatus::Abandoned;
                    return report;
                }
            };
            tracing::debug!(site, %kind, url = %url, "parsing page");

            let response = match self.fetch_page(url.as_str()) {
                Ok(r) => r,
                Err(e) => {
                    tracing::error!(site, %kind, url = %url, "giving up on page at {}: {}", cursor, e);
                    report.status = PairStatus::Abandoned;
                    return report;
                }
            };
            report.pages += 1;
            if response.status == SITE_MISSING_STATUS {
                tracing::warn!(site, %kind, "site {} does not exist", site);
                report.status = PairStatus::SiteMissing;
                return report;
            }

            match parse_page(&response.body) {
                Ok(FeedPage::Exhausted) => {
                    report.status = PairStatus::Exhausted;
                    return report;
                }
                Ok(FeedPage::Records(records)) => {
                    decode_failures = 0;
                    for unit in records.into_iter().flat_map(FeedRecord::into_units) {
                        self.accept_unit(site, kind, target_dir, unit, &mut report);
                    }
                    cursor += u64::from(self.page_size);
                }
                Err(e) => {
                    decode_failures += 1;
                    if decode_failures > self.max_decode_retries {
                        tracing::error!(
                            site,
                            %kind,
                            url = %url,
                            "page at {} undecodable after {} attempts: {}",
                            cursor,
                            decode_failures,
                            e
                        );
                        report.status = PairStatus::Abandoned;
                        return report;
                    }
                    tracing::warn!(site, %kind, url = %url, "retrying undecodable page: {}", e);
                }
            }
        }
    }

    /// GET with retry. 2xx and 404 are answers; other statuses are retried.
    fn fetch_page(&self, url: &str) -> Result<HttpResponse, FetchError> {
        run_with_retry(&self.policy, || {
            let response = self.http.get(url)?;
            if is_success(response.status) || response.status == SITE_MISSING_STATUS {
                Ok(response)
            } else {
                Err(FetchError::Http(response.status))
            }
        })
    }

    /// Resolve, name, dedup, enqueue. Failures affect this unit only.
    fn accept_unit(
        &mut self,
        site: &str,
        kind: MediaKind,
        target_dir: &Path,
        unit: FeedRecord,
        report: &mut PairReport,
    ) {
        let url = match self.resolver.resolve(kind, &unit) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(site, %kind, "{}", e);
                report.unresolvable += 1;
                return;
            }
        };
        let Some(filename) = derive_media_filename(kind, &url) else {
            tracing::warn!(site, %kind, url = %url, "no filename in url");
            report.unresolvable += 1;
            return;
        };
        if self.store.has(target_dir, &filename) {
            report.known += 1;
            return;
        }
        self.store.add(target_dir, &filename);
        self.queue.put(DownloadTask {
            site: site.to_string(),
            kind,
            record: unit,
            target_dir: target_dir.to_path_buf(),
            url,
        });
        report.enqueued += 1;
    }
}
