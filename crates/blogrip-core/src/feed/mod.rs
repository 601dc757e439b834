//! Feed pages and records.
//!
//! A page body is decoded, stripped to printable ASCII, and parsed into a
//! generic element tree. Records are `tumblr > posts > post` elements; the
//! rest of the crate treats them as opaque documents and only the URL
//! resolver looks at their fields.

mod parse;

use std::fmt;

/// Errors decoding a page body. All of them are transient from the
/// scheduler's point of view: the same cursor is fetched again.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("page body is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),
    #[error("malformed feed XML: {0}")]
    Xml(String),
    #[error("feed document ended unexpectedly")]
    Truncated,
}

/// One XML element: name, attributes in document order, concatenated text, children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// One record from the feed: a post, or one photo of a photo set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRecord(Element);

impl FeedRecord {
    pub fn new(element: Element) -> Self {
        FeedRecord(element)
    }

    pub fn element(&self) -> &Element {
        &self.0
    }

    /// Nested photo-set records, if this record carries a non-empty photo set.
    pub fn photoset(&self) -> Option<Vec<FeedRecord>> {
        let photos: Vec<FeedRecord> = self
            .0
            .child("photoset")?
            .children_named("photo")
            .cloned()
            .map(FeedRecord)
            .collect();
        if photos.is_empty() {
            None
        } else {
            Some(photos)
        }
    }

    /// Expands a record into its download units: one per photo-set member,
    /// or the record itself.
    pub fn into_units(self) -> Vec<FeedRecord> {
        match self.photoset() {
            Some(photos) => photos,
            None => vec![self],
        }
    }

    /// Texts of every child field with the given name, in document order.
    pub fn field_texts<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0.children_named(name).map(|e| e.text.as_str())
    }
}

impl fmt::Display for FeedRecord {
    /// Short description for diagnostics: element name plus identifying attributes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.0.name)?;
        for key in ["id", "type", "url", "offset"] {
            if let Some(v) = self.0.attr(key) {
                write!(f, " {}=\"{}\"", key, v)?;
            }
        }
        let fields: Vec<&str> = self.0.children.iter().map(|c| c.name.as_str()).collect();
        write!(f, "> fields=[{}]", fields.join(", "))
    }
}

/// Result of decoding one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedPage {
    /// Records on this page, in feed order.
    Records(Vec<FeedRecord>),
    /// No records container or no records: the feed is exhausted.
    Exhausted,
}

/// Decodes a raw page body into records.
pub fn parse_page(body: &[u8]) -> Result<FeedPage, FeedError> {
    let text = std::str::from_utf8(body)?;
    let cleaned = strip_to_printable_ascii(text);
    let root = parse::parse_document(&cleaned)?;

    let Some(posts) = root.child("posts") else {
        return Ok(FeedPage::Exhausted);
    };
    let records: Vec<FeedRecord> = posts
        .children_named("post")
        .cloned()
        .map(FeedRecord)
        .collect();
    if records.is_empty() {
        Ok(FeedPage::Exhausted)
    } else {
        Ok(FeedPage::Records(records))
    }
}

/// Drops every character outside `0x20..=0x7f`, line breaks and tabs included.
fn strip_to_printable_ascii(text: &str) -> String {
    text.chars().filter(|c| matches!(c, ' '..='\u{7f}')).collect()
}
