//! Media kinds served by the blog feed.

use std::fmt;
use std::path::Path;

/// Extension forced onto every derived video filename.
pub const VIDEO_EXTENSION: &str = ".mp4";

/// File extensions treated as already-downloaded media on disk.
pub const MEDIA_EXTENSIONS: [&str; 5] = ["gif", "jpg", "jpeg", "png", "mp4"];

/// Which feed field is read and whether a file extension is forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Processing order per site: photos first, then videos.
    pub const ALL: [MediaKind; 2] = [MediaKind::Photo, MediaKind::Video];

    /// Value of the feed endpoint's `type` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True if the filename carries one of the known media extensions (case-insensitive).
pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| MEDIA_EXTENSIONS.iter().any(|m| ext.eq_ignore_ascii_case(m)))
        .unwrap_or(false)
}

/// True if the filename will be rendered as a video in the HTML index.
pub fn is_video_file(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(VIDEO_EXTENSION)
}
