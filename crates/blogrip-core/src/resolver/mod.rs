//! URL resolution: turn a feed record into the concrete media URL.
//!
//! Photos read a fixed field. Videos read the embedded player snippet and try
//! an ordered list of [`ExtractRule`]s; the first rule that yields a URL wins.
//! The rule list is built once and owned by the resolver.

mod rules;

pub use rules::{DefaultSourceRule, ExtractRule, HdUrlRule};

use crate::feed::FeedRecord;
use crate::media::MediaKind;

/// Field holding photo URLs, largest resolution first.
const PHOTO_URL_FIELD: &str = "photo-url";
/// Field holding embedded video player snippets.
const VIDEO_PLAYER_FIELD: &str = "video-player";
/// Index of the player snippet that is read (the first sized variant).
const VIDEO_PLAYER_INDEX: usize = 1;

/// Resolution failure for a single unit. The record is carried for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("unable to find a {kind} url in record {record}")]
    NotResolvable {
        kind: MediaKind,
        record: Box<FeedRecord>,
    },
}

/// Resolves feed records to media URLs with a fixed, ordered rule list.
pub struct UrlResolver {
    video_rules: Vec<Box<dyn ExtractRule>>,
}

impl UrlResolver {
    /// Resolver with a caller-supplied rule order.
    pub fn new(video_rules: Vec<Box<dyn ExtractRule>>) -> Self {
        Self { video_rules }
    }

    /// HD URL first, then the default embedded source.
    pub fn with_default_rules() -> Result<Self, regex::Error> {
        Ok(Self::new(vec![
            Box::new(HdUrlRule::new()?),
            Box::new(DefaultSourceRule::new()?),
        ]))
    }

    pub fn resolve(&self, kind: MediaKind, record: &FeedRecord) -> Result<String, ResolveError> {
        let found = match kind {
            MediaKind::Photo => record
                .field_texts(PHOTO_URL_FIELD)
                .next()
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            MediaKind::Video => self.resolve_video(record),
        };
        found.ok_or_else(|| ResolveError::NotResolvable {
            kind,
            record: Box::new(record.clone()),
        })
    }

    fn resolve_video(&self, record: &FeedRecord) -> Option<String> {
        let players: Vec<&str> = record.field_texts(VIDEO_PLAYER_FIELD).collect();
        let player = players
            .get(VIDEO_PLAYER_INDEX)
            .or_else(|| players.first())?;
        self.video_rules.iter().find_map(|rule| {
            let url = rule.extract(player)?;
            tracing::trace!(rule = rule.name(), %url, "video url extracted");
            Some(url)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Element;

    fn field(name: &str, text: &str) -> Element {
        Element {
            name: name.to_string(),
            text: text.to_string(),
            ..Element::default()
        }
    }

    fn record(fields: Vec<Element>) -> FeedRecord {
        FeedRecord::new(Element {
            name: "post".to_string(),
            attrs: vec![("id".to_string(), "42".to_string())],
            children: fields,
            ..Element::default()
        })
    }

    #[test]
    fn photo_reads_first_url_field() {
        let resolver = UrlResolver::with_default_rules().unwrap();
        let r = record(vec![
            field("photo-url", "https://m.example.com/a/tumblr_x_1280.jpg"),
            field("photo-url", "https://m.example.com/a/tumblr_x_500.jpg"),
        ]);
        assert_eq!(
            resolver.resolve(MediaKind::Photo, &r).unwrap(),
            "https://m.example.com/a/tumblr_x_1280.jpg"
        );
    }

    #[test]
    fn photo_without_url_is_not_resolvable() {
        let resolver = UrlResolver::with_default_rules().unwrap();
        let r = record(vec![field("photo-caption", "hi")]);
        let err = resolver.resolve(MediaKind::Photo, &r).unwrap_err();
        let ResolveError::NotResolvable { kind, record } = err;
        assert_eq!(kind, MediaKind::Photo);
        assert_eq!(record.element().attr("id"), Some("42"));
    }

    #[test]
    fn video_prefers_hd_url() {
        let resolver = UrlResolver::with_default_rules().unwrap();
        let player = r#"<video data-crt-options='{"hdUrl":"https:\/\/vt.example.com\/tumblr_hd_720.mp4","x":1}'><source src="https://vt.example.com/tumblr_sd_480" type="video/mp4"></video>"#;
        let r = record(vec![field("video-player", "<iframe/>"), field("video-player", player)]);
        assert_eq!(
            resolver.resolve(MediaKind::Video, &r).unwrap(),
            "https://vt.example.com/tumblr_hd_720.mp4"
        );
    }

    #[test]
    fn video_falls_back_to_default_source() {
        let resolver = UrlResolver::with_default_rules().unwrap();
        let player = r#"<video data-crt-options='{"hdUrl":false,"x":1}'><source src="https://vt.example.com/tumblr_sd_480" type="video/mp4"></video>"#;
        let r = record(vec![field("video-player", "<iframe/>"), field("video-player", player)]);
        assert_eq!(
            resolver.resolve(MediaKind::Video, &r).unwrap(),
            "https://vt.example.com/tumblr_sd_480"
        );
    }

    #[test]
    fn single_player_snippet_is_used() {
        let resolver = UrlResolver::with_default_rules().unwrap();
        let player = r#"<source src="https://vt.example.com/tumblr_only" type="video/mp4">"#;
        let r = record(vec![field("video-player", player)]);
        assert_eq!(
            resolver.resolve(MediaKind::Video, &r).unwrap(),
            "https://vt.example.com/tumblr_only"
        );
    }

    #[test]
    fn video_without_match_is_not_resolvable() {
        let resolver = UrlResolver::with_default_rules().unwrap();
        let r = record(vec![
            field("video-player", "<iframe/>"),
            field("video-player", "<embed nothing here>"),
        ]);
        assert!(resolver.resolve(MediaKind::Video, &r).is_err());
        assert!(resolver
            .resolve(MediaKind::Video, &record(vec![]))
            .is_err());
    }

    #[test]
    fn rule_order_is_respected() {
        struct Fixed(&'static str);
        impl ExtractRule for Fixed {
            fn name(&self) -> &'static str {
                "fixed"
            }
            fn extract(&self, _player: &str) -> Option<String> {
                Some(self.0.to_string())
            }
        }
        let resolver = UrlResolver::new(vec![Box::new(Fixed("first")), Box::new(Fixed("second"))]);
        let r = record(vec![field("video-player", "anything")]);
        assert_eq!(resolver.resolve(MediaKind::Video, &r).unwrap(), "first");
    }
}
