use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Placeholder substituted with the site name in `feed_base_url`.
pub const SITE_PLACEHOLDER: &str = "{site}";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms; 0 = immediate).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        RetryPolicy {
            max_attempts: cfg.max_attempts,
            base_delay: Duration::from_secs_f64(cfg.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(cfg.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/blogrip/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RipperConfig {
    /// Number of concurrent download workers.
    pub workers: usize,
    /// Records requested per feed page.
    pub page_size: u32,
    /// Connect/stall timeout per HTTP request, in seconds.
    pub request_timeout_secs: u64,
    /// Consecutive undecodable pages tolerated at one cursor before the feed is abandoned.
    pub max_page_decode_retries: u32,
    /// Feed host template; `{site}` is replaced with the site name.
    pub feed_base_url: String,
    /// Optional User-Agent header for every request.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for RipperConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            page_size: 200,
            request_timeout_secs: 10,
            max_page_decode_retries: 3,
            feed_base_url: "http://{site}.tumblr.com".to_string(),
            user_agent: None,
            retry: None,
        }
    }
}

impl RipperConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Rejects values the scheduler cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            anyhow::bail!("workers must be at least 1");
        }
        if self.page_size == 0 {
            anyhow::bail!("page_size must be at least 1");
        }
        if let Some(retry) = &self.retry {
            if retry.max_attempts == 0 {
                anyhow::bail!("retry.max_attempts must be at least 1");
            }
            let base = retry.base_delay_secs;
            if !base.is_finite() || base < 0.0 || base > retry.max_delay_secs as f64 {
                anyhow::bail!(
                    "retry.base_delay_secs must be between 0 and retry.max_delay_secs ({}), got {}",
                    retry.max_delay_secs,
                    base
                );
            }
        }
        if !self.feed_base_url.contains(SITE_PLACEHOLDER) {
            anyhow::bail!(
                "feed_base_url must contain {} (got {})",
                SITE_PLACEHOLDER,
                self.feed_base_url
            );
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("blogrip")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RipperConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RipperConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<RipperConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: RipperConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
