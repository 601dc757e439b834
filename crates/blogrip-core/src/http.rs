//! Blocking HTTP GET over libcurl.
//!
//! One `Easy` handle per request. Runs in the calling thread; callers are the
//! scheduler thread (feed pages) and the download workers (media bodies).

use std::cell::Cell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str;
use std::time::Duration;

use crate::proxy::ProxyConfig;

/// Buffer size for streaming response bodies to disk.
const CHUNK_SIZE: usize = 16 * 1024;
/// Hard ceiling for a single transfer; stalls are caught earlier by the low-speed limit.
const MAX_TRANSFER_TIME: Duration = Duration::from_secs(3600);

/// Error returned by a single HTTP attempt. Classified by [`crate::retry`].
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, malformed URL, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing the body to disk failed.
    #[error("storage: {0}")]
    Storage(std::io::Error),
}

/// Status and full body of a GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

pub fn is_success(status: u32) -> bool {
    (200..300).contains(&status)
}

/// Shared request settings: timeout, proxy, user agent.
#[derive(Debug, Clone)]
pub struct HttpClient {
    timeout: Duration,
    proxy: Option<ProxyConfig>,
    user_agent: Option<String>,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            proxy: None,
            user_agent: None,
        }
    }

    pub fn with_proxy(mut self, proxy: Option<ProxyConfig>) -> Self {
        self.proxy = proxy.filter(|p| !p.is_empty());
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    fn easy_for(&self, url: &str) -> Result<curl::easy::Easy, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.timeout)?;
        // A transfer that moves less than 1 byte/s for `timeout` is treated as timed out.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.timeout)?;
        easy.timeout(MAX_TRANSFER_TIME)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }
        if let Some(proxy) = self.proxy.as_ref().and_then(|p| p.proxy_for(url)) {
            easy.proxy(proxy)?;
        }
        Ok(easy)
    }

    /// GET `url` into memory. The status is returned, not judged.
    pub fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let mut body = Vec::new();
        let mut easy = self.easy_for(url)?;
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }
        let status = easy.response_code()?;
        Ok(HttpResponse { status, body })
    }

    /// Streams a 2xx body of `url` into a newly created file at `path`.
    /// Returns the number of bytes written. Bodies of non-2xx responses are
    /// discarded and reported as [`FetchError::Http`]; the file is left for
    /// the caller to remove.
    pub fn download_to(&self, url: &str, path: &Path) -> Result<u64, FetchError> {
        let file = File::create(path).map_err(FetchError::Storage)?;
        let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
        let mut easy = self.easy_for(url)?;

        // Status of the latest response in a redirect chain.
        let status = Cell::new(0u32);
        let mut written = 0u64;
        let mut write_error: Option<std::io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|line| {
                if let Some(code) = parse_status_line(line) {
                    status.set(code);
                }
                true
            })?;
            transfer.write_function(|data| {
                if !is_success(status.get()) {
                    return Ok(data.len());
                }
                match writer.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        write_error = Some(e);
                        Ok(0) // abort transfer
                    }
                }
            })?;
            transfer.perform()
        };

        if let Err(e) = performed {
            if e.is_write_error() {
                if let Some(io_err) = write_error {
                    return Err(FetchError::Storage(io_err));
                }
            }
            return Err(FetchError::Curl(e));
        }

        let code = easy.response_code()?;
        if !is_success(code) {
            return Err(FetchError::Http(code));
        }
        writer.flush().map_err(FetchError::Storage)?;
        Ok(written)
    }
}

/// Parses `HTTP/1.1 200 OK` (or `HTTP/2 200`) into its status code.
fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = str::from_utf8(line).ok()?;
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}
