//! Feed page URLs: `<base>/api/read?type=<kind>&num=<n>&start=<cursor>`.

use anyhow::{Context, Result};
use url::Url;

use crate::config::SITE_PLACEHOLDER;
use crate::media::MediaKind;

#[derive(Debug, Clone)]
pub struct FeedEndpoint {
    template: String,
}

impl FeedEndpoint {
    /// `template` is a base URL containing `{site}`, e.g. `http://{site}.tumblr.com`.
    pub fn new(template: &str) -> Result<Self> {
        if !template.contains(SITE_PLACEHOLDER) {
            anyhow::bail!("feed base url has no {} placeholder: {}", SITE_PLACEHOLDER, template);
        }
        Ok(Self {
            template: template.to_string(),
        })
    }

    pub fn page_url(&self, site: &str, kind: MediaKind, num: u32, start: u64) -> Result<Url> {
        let base = self.template.replace(SITE_PLACEHOLDER, site);
        let mut url = Url::parse(&base).with_context(|| format!("feed url for {}: {}", site, base))?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("feed base url cannot carry a path: {}", base))?
            .pop_if_empty()
            .extend(["api", "read"]);
        url.query_pairs_mut()
            .append_pair("type", kind.as_str())
            .append_pair("num", &num.to_string())
            .append_pair("start", &start.to_string());
        Ok(url)
    }
}
