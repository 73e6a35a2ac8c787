//! Visible-text extraction
//!
//! Turns a raw HTML body into the single line of normalized text that gets
//! saved for a page.

use scraper::{Html, Node};

/// Elements whose whole subtree is never visible text
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Result of extracting text from a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Normalized visible text, never empty
    Text(String),
    /// Nothing worth saving: no visible text, or the body is not HTML
    Empty,
}

impl Extraction {
    /// Returns the text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Extracts normalized visible text from an HTML body
///
/// `script`, `style` and `noscript` subtrees are dropped. All remaining text
/// nodes are joined and every whitespace run (newlines included) collapses
/// to a single space, with no leading or trailing whitespace.
///
/// # Arguments
///
/// * `html` - The raw response body
/// * `content_type` - The response Content-Type header value
///
/// # Returns
///
/// `Extraction::Empty` when the content type is not HTML or no visible text
/// remains, otherwise `Extraction::Text`
pub fn extract_text(html: &str, content_type: &str) -> Extraction {
    if !content_type.to_ascii_lowercase().contains("html") {
        return Extraction::Empty;
    }

    // html5ever recovers from any malformed input, so parsing cannot fail here
    let document = Html::parse_document(html);
    let mut words: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|element| SKIPPED_ELEMENTS.contains(&element.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        words.extend(text.split_whitespace());
    }

    if words.is_empty() {
        Extraction::Empty
    } else {
        Extraction::Text(words.join(" "))
    }
}
