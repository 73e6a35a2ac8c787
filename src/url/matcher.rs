/// Checks if a normalized host falls under a crawl domain
///
/// A host matches when it is the domain itself or any subdomain of it:
/// - "example.com" matches "example.com"
/// - "example.com" matches "blog.example.com" and "api.v2.example.com"
/// - "example.com" does not match "notexample.com"
///
/// Both arguments are expected to be normalized already.
///
/// # Examples
///
/// ```
/// use ledger_crawl::url::matches_domain;
///
/// assert!(matches_domain("example.com", "example.com"));
/// assert!(matches_domain("example.com", "blog.example.com"));
/// assert!(!matches_domain("example.com", "example.org"));
/// ```
pub fn matches_domain(domain: &str, candidate: &str) -> bool {
    if domain.is_empty() {
        return false;
    }

    candidate == domain
        || (candidate.len() > domain.len()
            && candidate.ends_with(domain)
            && candidate.as_bytes()[candidate.len() - domain.len() - 1] == b'.')
}
