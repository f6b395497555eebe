//! Document kinds and their content negotiation.

use std::path::Path;

use mime::Mime;

/// The two kinds of document the store recognizes. Everything else that ends
/// up in the store directory is served as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Markdown,
}

impl DocumentKind {
    /// Kind by real file extension. `None` for anything unrecognized; note
    /// that names accepted by validation are not guaranteed to map to a kind
    /// (`foo.txtbar` validates, but its extension is `txtbar`).
    pub fn from_name(name: &str) -> Option<Self> {
        match Path::new(name).extension().and_then(|ext| ext.to_str()) {
            Some("txt") => Some(DocumentKind::PlainText),
            Some("md") => Some(DocumentKind::Markdown),
            _ => None,
        }
    }

    /// Content type of the response body once the document is rendered.
    pub fn content_type(&self) -> Mime {
        match self {
            DocumentKind::PlainText => mime::TEXT_PLAIN,
            DocumentKind::Markdown => mime::TEXT_HTML_UTF_8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_the_real_extension() {
        assert_eq!(DocumentKind::from_name("about.txt"), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::from_name("changes.md"), Some(DocumentKind::Markdown));
        assert_eq!(DocumentKind::from_name("notes.markdown"), None);
        assert_eq!(DocumentKind::from_name("foo.txtbar"), None);
        assert_eq!(DocumentKind::from_name("no_extension"), None);
    }

    #[test]
    fn content_types_match_the_kind() {
        assert_eq!(DocumentKind::PlainText.content_type(), mime::TEXT_PLAIN);
        assert_eq!(DocumentKind::Markdown.content_type(), mime::TEXT_HTML_UTF_8);
    }
}
