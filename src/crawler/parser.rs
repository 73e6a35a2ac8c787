//! HTML parser for link discovery
//!
//! This module extracts the outbound links of a fetched page. Only
//! `<a href="...">` anchors are followed; domain scoping happens later, at
//! frontier admission.

use crate::url::crawl_url;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts all followable links from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, resolved against `base_url`
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that is not HTTP(S) after resolution
///
/// Fragments are stripped and duplicates removed, keeping the order in which
/// links first appear.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The URL the page was served from, for relative links
///
/// # Example
///
/// ```no_run
/// use ledger_crawl::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page#top">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_link(href, base_url) {
                if seen.insert(absolute_url.clone()) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    base_url
        .join(href)
        .ok()
        .and_then(|absolute_url| crawl_url(&absolute_url))
}
