//! Path segment extraction from raw media URLs.
//!
//! Works on the URL text rather than a parsed `url::Url` so that the derived
//! names stay byte-for-byte stable across runs (they are persisted dedup keys).

/// Last `/`-separated segment of `url`, with any query string removed.
///
/// A URL ending in `/` yields an empty segment.
pub fn last_segment(url: &str) -> &str {
    let segment = url.rsplit('/').next().unwrap_or(url);
    strip_query(segment)
}

/// Second-to-last `/`-separated segment of `url`, if the URL has one.
pub fn parent_segment(url: &str) -> Option<&str> {
    let mut parts = url.rsplit('/');
    parts.next()?;
    parts.next()
}

fn strip_query(segment: &str) -> &str {
    match segment.split_once('?') {
        Some((head, _)) => head,
        None => segment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_segment_normal() {
        assert_eq!(
            last_segment("https://64.media.example.com/abc/tumblr_x_1280.jpg"),
            "tumblr_x_1280.jpg"
        );
        assert_eq!(last_segment("single"), "single");
    }

    #[test]
    fn last_segment_strips_query() {
        assert_eq!(last_segment("https://example.com/a/b.png?w=500&h=2"), "b.png");
    }

    #[test]
    fn last_segment_trailing_slash_is_empty() {
        assert_eq!(last_segment("https://example.com/a/"), "");
    }

    #[test]
    fn parent_segment_cases() {
        assert_eq!(parent_segment("https://example.com/video_file/123/abc"), Some("123"));
        assert_eq!(parent_segment("https://vt.example.com/clip"), Some("vt.example.com"));
        assert_eq!(parent_segment("clip"), None);
    }
}
