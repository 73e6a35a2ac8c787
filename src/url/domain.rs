use crate::url::matcher::matches_domain;
use url::Url;

/// Normalizes a host (optionally carrying a port) to its domain key
///
/// Strips the port, lowercases, and removes one leading `www.` label. Two hosts
/// belong to the same crawl domain iff their normalized values are equal.
///
/// # Examples
///
/// ```
/// use ledger_crawl::url::normalize_domain;
///
/// assert_eq!(normalize_domain("www.Example.com:443"), "example.com");
/// assert_eq!(normalize_domain("sub.example.com"), "sub.example.com");
/// ```
pub fn normalize_domain(host: &str) -> String {
    let host = host.trim();

    // Bracketed IPv6 literals carry colons of their own
    let without_port = if host.starts_with('[') {
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    };

    let lowered = without_port.to_lowercase();
    match lowered.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

/// Returns the normalized domain of a URL string
///
/// # Returns
///
/// * `Some(String)` - The normalized domain
/// * `None` - If the URL cannot be parsed or has no host
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    parsed.host_str().map(normalize_domain)
}

/// Checks whether a URL belongs to a crawl domain
///
/// True when the URL's normalized host equals `domain` or is a subdomain of
/// it. Malformed URLs are treated as out-of-domain.
///
/// # Examples
///
/// ```
/// use ledger_crawl::url::url_in_domain;
///
/// assert!(url_in_domain("https://catalog.example.com/x", "example.com"));
/// assert!(!url_in_domain("https://other.org/x", "example.com"));
/// assert!(!url_in_domain("not a url", "example.com"));
/// ```
pub fn url_in_domain(url: &str, domain: &str) -> bool {
    match domain_of(url) {
        Some(host) => matches_domain(domain, &host),
        None => false,
    }
}
