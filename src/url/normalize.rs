use crate::url::domain::normalize_domain;
use crate::UrlError;
use url::Url;

/// Removes the fragment from an absolute URL string
///
/// Works on the raw string so the rest of the URL is left byte-for-byte as
/// discovered; the frontier and the ledger key on that exact form.
pub fn strip_fragment(url: &str) -> &str {
    match url.split_once('#') {
        Some((head, _)) => head,
        None => url,
    }
}

/// The exact form a URL is queued, visited and recorded under
///
/// Discovered links and sitemap locations both pass through here, so the
/// same page reached either way compares equal. Returns `None` for
/// non-http(s) schemes.
pub fn crawl_url(url: &Url) -> Option<String> {
    match url.scheme() {
        "http" | "https" => Some(strip_fragment(url.as_str()).to_string()),
        _ => None,
    }
}

/// Produces the canonical key used to deduplicate ledger rows downstream
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed or not http(s)
/// 2. Normalize the host (lowercase, drop port and `www.`)
/// 3. Drop query string and fragment
/// 4. Remove dot segments and empty segments from the path
/// 5. Remove the trailing slash (root becomes empty)
///
/// The scheme is kept, so `http://` and `https://` variants stay distinct.
///
/// # Examples
///
/// ```
/// use ledger_crawl::url::canonical_url;
///
/// let a = canonical_url("https://www.Example.com/page/?a=1").unwrap();
/// let b = canonical_url("https://example.com/page").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a, "https://example.com/page");
/// ```
pub fn canonical_url(url_str: &str) -> Result<String, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url.host_str().ok_or(UrlError::MissingDomain)?;
    let domain = normalize_domain(host);

    Ok(format!(
        "{}://{}{}",
        url.scheme(),
        domain,
        normalize_path(url.path())
    ))
}

/// Normalizes a URL path by removing dot segments and the trailing slash
fn normalize_path(path: &str) -> String {
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            // Skip empty segments (from multiple slashes) and current directory markers
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return String::new();
    }

    format!("/{}", normalized_segments.join("/"))
}
