//! Outbound proxy configuration.
//!
//! Read from a JSON object mapping URL scheme to proxy URL, e.g.
//! `{"http": "http://10.10.1.10:3128", "https": "socks5://127.0.0.1:1080"}`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub http: Option<String>,
    #[serde(default)]
    pub https: Option<String>,
}

impl ProxyConfig {
    /// Loads a proxy file. A file that is not a valid proxy object is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("read proxy file: {}", path.display()))?;
        let cfg: ProxyConfig = serde_json::from_slice(&data)
            .with_context(|| format!("illegal JSON in proxy file: {}", path.display()))?;
        Ok(cfg)
    }

    pub fn is_empty(&self) -> bool {
        self.http.is_none() && self.https.is_none()
    }

    /// Proxy to use for `url`, chosen by its scheme.
    pub fn proxy_for(&self, url: &str) -> Option<&str> {
        let scheme = url::Url::parse(url).ok()?.scheme().to_ascii_lowercase();
        match scheme.as_str() {
            "http" => self.http.as_deref(),
            "https" => self.https.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn proxy_chosen_by_scheme() {
        let cfg = ProxyConfig {
            http: Some("http://proxy:3128".to_string()),
            https: None,
        };
        assert_eq!(cfg.proxy_for("http://a.example.com/x"), Some("http://proxy:3128"));
        assert_eq!(cfg.proxy_for("https://a.example.com/x"), None);
        assert_eq!(cfg.proxy_for("not a url"), None);
    }

    #[test]
    fn load_valid_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(br#"{"http": "http://p:1", "https": "http://p:2"}"#).unwrap();
        f.flush().unwrap();
        let cfg = ProxyConfig::load(f.path()).unwrap();
        assert_eq!(cfg.https.as_deref(), Some("http://p:2"));
        assert!(!cfg.is_empty());
    }

    #[test]
    fn load_illegal_json_fails() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"{http: nope").unwrap();
        f.flush().unwrap();
        let err = ProxyConfig::load(f.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("illegal JSON"));
    }

    #[test]
    fn empty_object_is_empty() {
        let cfg: ProxyConfig = serde_json::from_str("{}").unwrap();
        assert!(cfg.is_empty());
    }
}
