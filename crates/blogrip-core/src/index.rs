//! Static `index.html` pages for browsing downloaded media.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::media::{is_media_file, is_video_file};

pub const INDEX_FILE_NAME: &str = "index.html";

/// Writes an index into every directory under `root` that holds media
/// (only `root` itself unless `recursive`). Returns the written paths, sorted.
pub fn build_index(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("directory not found: {}", root.display());
    }
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut by_dir: BTreeMap<PathBuf, BTreeSet<String>> = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(max_depth) {
        let entry = entry.with_context(|| format!("walk {}", root.display()))?;
        if !entry.file_type().is_file() || !is_media_file(entry.path()) {
            continue;
        }
        let (Some(dir), Some(name)) = (entry.path().parent(), entry.file_name().to_str()) else {
            continue;
        };
        by_dir
            .entry(dir.to_path_buf())
            .or_default()
            .insert(name.to_string());
    }

    let mut written = Vec::with_capacity(by_dir.len());
    for (dir, files) in &by_dir {
        let path = dir.join(INDEX_FILE_NAME);
        std::fs::write(&path, render_index(dir, files))
            .with_context(|| format!("write index: {}", path.display()))?;
        tracing::debug!(files = files.len(), "wrote {}", path.display());
        written.push(path);
    }
    tracing::info!(pages = written.len(), "built index under {}", root.display());
    Ok(written)
}

pub fn render_index<'a, I>(dir: &Path, files: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let mut html = String::from(
        "<html>\n<body>\n<style>\nimg {\n    max-width: 100%;\n    height: auto;\n}\n</style>\n",
    );
    let _ = writeln!(html, "<h1>Directory {}</h1>", escape_html(&dir.display().to_string()));
    html.push_str("<ul>\n");
    for name in files {
        let src = escape_html(name);
        if is_video_file(name) {
            let _ = writeln!(
                html,
                "<li><video controls><source src=\"{}\" type=\"video/mp4\"></video></li>",
                src
            );
        } else {
            let _ = writeln!(html, "<li><img src=\"{}\" alt=\"\"></li>", src);
        }
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
