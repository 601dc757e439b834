//! Local filename derivation for resolved media URLs.
//!
//! The derived name is both the on-disk filename and the dedup key, so it
//! must be a pure function of `(kind, url)`.

mod path;

pub use path::{last_segment, parent_segment};

use crate::media::{MediaKind, VIDEO_EXTENSION};

/// Prefix carried by canonical platform asset names.
const CANONICAL_PREFIX: &str = "tumblr";

/// Derives the local filename for a resolved media URL.
///
/// - Photo: the last path segment without its query string, extension as given.
/// - Video: same segment, prefixed with `<parent segment>_` unless it already
///   starts with the canonical prefix; `.mp4` is always appended, even when the
///   segment already ends in `.mp4` (existing dedup keys depend on it).
///
/// Returns `None` for degenerate segments (empty, `.` or `..`).
///
/// # Examples
///
/// - `(Photo, "https://h/abc/tumblr_x_1280.jpg?x=1")` → `"tumblr_x_1280.jpg"`
/// - `(Video, "https://h/video_file/123/abc")` → `"123_abc.mp4"`
/// - `(Video, "https://vt.h/tumblr_abc_480.mp4")` → `"tumblr_abc_480.mp4.mp4"`
pub fn derive_media_filename(kind: MediaKind, url: &str) -> Option<String> {
    let segment = last_segment(url);
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }

    match kind {
        MediaKind::Photo => Some(segment.to_string()),
        MediaKind::Video => {
            let mut name = if segment.starts_with(CANONICAL_PREFIX) {
                segment.to_string()
            } else {
                match parent_segment(url) {
                    Some(parent) => format!("{}_{}", parent, segment),
                    None => segment.to_string(),
                }
            };
            name.push_str(VIDEO_EXTENSION);
            Some(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_keeps_segment_and_extension() {
        assert_eq!(
            derive_media_filename(
                MediaKind::Photo,
                "https://64.media.example.com/5f2/tumblr_abc_1280.jpg"
            )
            .as_deref(),
            Some("tumblr_abc_1280.jpg")
        );
        assert_eq!(
            derive_media_filename(MediaKind::Photo, "https://h.example.com/p/pic.png?w=1").as_deref(),
            Some("pic.png")
        );
    }

    #[test]
    fn video_with_canonical_prefix_gets_extension() {
        assert_eq!(
            derive_media_filename(
                MediaKind::Video,
                "https://www.example.com/video_file/t:abc/123/tumblr_o1abc"
            )
            .as_deref(),
            Some("tumblr_o1abc.mp4")
        );
    }

    #[test]
    fn video_without_prefix_joins_parent_segment() {
        assert_eq!(
            derive_media_filename(MediaKind::Video, "https://www.example.com/video_file/123/abc")
                .as_deref(),
            Some("123_abc.mp4")
        );
    }

    #[test]
    fn video_extension_forced_even_when_present() {
        assert_eq!(
            derive_media_filename(MediaKind::Video, "https://vt.example.com/tumblr_abc_480.mp4")
                .as_deref(),
            Some("tumblr_abc_480.mp4.mp4")
        );
    }

    #[test]
    fn degenerate_segments_yield_none() {
        assert_eq!(derive_media_filename(MediaKind::Photo, "https://example.com/"), None);
        assert_eq!(derive_media_filename(MediaKind::Photo, "https://example.com/.."), None);
        assert_eq!(derive_media_filename(MediaKind::Video, "https://example.com/?q=1"), None);
    }

    #[test]
    fn derivation_is_deterministic() {
        let url = "https://www.example.com/video_file/999/clip?token=abc";
        let a = derive_media_filename(MediaKind::Video, url);
        let b = derive_media_filename(MediaKind::Video, url);
        assert_eq!(a, b);
        assert_eq!(a.as_deref(), Some("999_clip.mp4"));
    }
}
