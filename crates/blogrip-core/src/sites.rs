//! Site list parsing.

use anyhow::{Context, Result};
use std::path::Path;

/// Splits on commas and whitespace, dropping empty entries. Order is kept.
pub fn parse_sites(text: &str) -> Vec<String> {
    text.split(|c: char| matches!(c, ',' | ' ' | '\t' | '\r' | '\n'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_sites_file(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read sites file: {}", path.display()))?;
    Ok(parse_sites(&text))
}

/// Entries starting with `#` are kept in lists but never fetched.
pub fn is_commented_out(site: &str) -> bool {
    site.starts_with('#')
}

/// A site name becomes a directory under the output root; reject anything
/// that would escape it.
pub fn is_valid_site_name(site: &str) -> bool {
    !site.is_empty() && site != "." && site != ".." && !site.contains(['/', '\\'])
}
