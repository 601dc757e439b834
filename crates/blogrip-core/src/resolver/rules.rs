//! Extraction rules for embedded video player snippets.

use regex::Regex;

/// One strategy for pulling a media URL out of a player snippet.
pub trait ExtractRule: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the URL this rule finds in `player`, or `None` to fall through.
    fn extract(&self, player: &str) -> Option<String>;
}

/// High-definition URL declared in the player's options blob:
/// `"hdUrl":"https:\/\/...",` (JSON-escaped) or `"hdUrl":false,`.
/// When the snippet declares it more than once, the last declaration wins.
pub struct HdUrlRule {
    pattern: Regex,
}

impl HdUrlRule {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r#""hdUrl":("([^\s,]*)"|false),"#)?,
        })
    }
}

impl ExtractRule for HdUrlRule {
    fn name(&self) -> &'static str {
        "hd-url"
    }

    fn extract(&self, player: &str) -> Option<String> {
        let caps = self.pattern.captures_iter(player).last()?;
        // Group 2 only participates when the value is a quoted string, not `false`.
        let raw = caps.get(2)?.as_str();
        let url = raw.replace('\\', "");
        if url.is_empty() {
            None
        } else {
            Some(url)
        }
    }
}

/// Default embedded source: the last `src="..." ` attribute in the snippet.
pub struct DefaultSourceRule {
    pattern: Regex,
}

impl DefaultSourceRule {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r#"(?s)^.*src="(\S*)" "#)?,
        })
    }
}

impl ExtractRule for DefaultSourceRule {
    fn name(&self) -> &'static str {
        "default-source"
    }

    fn extract(&self, player: &str) -> Option<String> {
        let caps = self.pattern.captures(player)?;
        let url = caps.get(1)?.as_str();
        if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hd_rule_unescapes_url() {
        let rule = HdUrlRule::new().unwrap();
        let player = r#"<video data-crt-options='{"autoheight":null,"hdUrl":"https:\/\/vt.example.com\/tumblr_abc_720.mp4","filmstrip":{}}'>"#;
        assert_eq!(
            rule.extract(player).as_deref(),
            Some("https://vt.example.com/tumblr_abc_720.mp4")
        );
    }

    #[test]
    fn hd_rule_false_falls_through() {
        let rule = HdUrlRule::new().unwrap();
        let player = r#"<video data-crt-options='{"hdUrl":false,"filmstrip":{}}'>"#;
        assert_eq!(rule.extract(player), None);
    }

    #[test]
    fn hd_rule_uses_last_declaration() {
        let rule = HdUrlRule::new().unwrap();
        let player = r#"{"hdUrl":false,"a":1} {"hdUrl":"https:\/\/h\/tumblr_hd.mp4","b":2}"#;
        assert_eq!(rule.extract(player).as_deref(), Some("https://h/tumblr_hd.mp4"));

        let player = r#"{"hdUrl":"https:\/\/h\/tumblr_hd.mp4","a":1} {"hdUrl":false,"b":2}"#;
        assert_eq!(rule.extract(player), None);
    }

    #[test]
    fn hd_rule_absent_falls_through() {
        let rule = HdUrlRule::new().unwrap();
        assert_eq!(rule.extract(r#"<video src="x" >"#), None);
    }

    #[test]
    fn default_rule_takes_last_src() {
        let rule = DefaultSourceRule::new().unwrap();
        let player = "<video poster=\"p.jpg\">\n<source src=\"https://vt.example.com/first\" type=\"video/mp4\">\n<source src=\"https://vt.example.com/tumblr_last\" type=\"video/mp4\"></video>";
        assert_eq!(
            rule.extract(player).as_deref(),
            Some("https://vt.example.com/tumblr_last")
        );
    }

    #[test]
    fn default_rule_requires_trailing_space() {
        let rule = DefaultSourceRule::new().unwrap();
        assert_eq!(rule.extract(r#"<source src="https://vt.example.com/x">"#), None);
    }
}
