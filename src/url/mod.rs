//! URL handling module
//!
//! This module provides host normalization, domain membership checks used to
//! scope a crawl, and the canonical URL form used for downstream dedup.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{domain_of, normalize_domain, url_in_domain};
pub use matcher::matches_domain;
pub use normalize::{canonical_url, crawl_url, strip_fragment};

use crate::UrlError;
use url::Url;

/// A base URL identifying one domain to crawl
///
/// Built once per target from configuration and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    base_url: Url,
    domain: String,
}

impl CrawlTarget {
    /// Parses a configured base URL into a crawl target
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlTarget)` - A target with its normalized domain
    /// * `Err(UrlError)` - Malformed URL, non-http(s) scheme, or no host
    pub fn parse(base_url: &str) -> Result<Self, UrlError> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(base_url.scheme().to_string()));
        }

        let domain = base_url
            .host_str()
            .map(normalize_domain)
            .filter(|d| !d.is_empty())
            .ok_or(UrlError::MissingDomain)?;

        Ok(Self { base_url, domain })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn scheme(&self) -> &str {
        self.base_url.scheme()
    }

    /// Normalized domain used for scoping and ledger filtering
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The URL seeded when no sitemap yields in-domain URLs
    pub fn root_url(&self) -> String {
        strip_fragment(self.base_url.as_str()).to_string()
    }

    /// `/robots.txt` resolved against the base URL
    pub fn robots_url(&self) -> Option<Url> {
        self.base_url.join("/robots.txt").ok()
    }
}
