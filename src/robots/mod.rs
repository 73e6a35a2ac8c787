//! Robots.txt handling module
//!
//! This module provides the politeness gate of a domain: robots.txt rules
//! loaded once per domain crawl, and the sitemap hints they declare.

mod parser;
mod sitemap;

pub use parser::ParsedRobots;
pub use sitemap::{parse_sitemap_locs, sitemap_seeds};

use crate::url::CrawlTarget;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// User agent token checked against robots.txt groups
pub const ROBOTS_AGENT: &str = "*";

/// Politeness rules for a single domain
#[derive(Debug, Clone)]
pub struct PolitenessGate {
    robots: ParsedRobots,
}

impl PolitenessGate {
    /// Wraps already parsed rules
    pub fn new(robots: ParsedRobots) -> Self {
        Self { robots }
    }

    /// A gate that lets everything through
    pub fn unrestricted() -> Self {
        Self::new(ParsedRobots::allow_all())
    }

    /// Fetches and parses robots.txt for a target
    ///
    /// # Status Handling
    ///
    /// | Response | Rules |
    /// |----------|-------|
    /// | 200 | Parsed from the body |
    /// | 401, 403 | Disallow everything |
    /// | Other 4xx | No restrictions |
    /// | 5xx, network error, timeout | No restrictions |
    ///
    /// Never fails: every problem degrades to an unrestricted gate.
    ///
    /// # Arguments
    ///
    /// * `client` - The crawler's HTTP client
    /// * `target` - The domain being crawled
    /// * `timeout` - Request timeout for robots.txt
    pub async fn load(client: &Client, target: &CrawlTarget, timeout: Duration) -> Self {
        let Some(robots_url) = target.robots_url() else {
            return Self::unrestricted();
        };

        let response = match client.get(robots_url.as_str()).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Could not fetch {}: {}; crawling unrestricted", robots_url, e);
                return Self::unrestricted();
            }
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!("{} answered {}; treating every URL as disallowed", robots_url, status);
            return Self::new(ParsedRobots::disallow_all());
        }

        if !status.is_success() {
            tracing::info!("No usable robots.txt for {} (HTTP {})", target.domain(), status.as_u16());
            return Self::unrestricted();
        }

        match response.text().await {
            Ok(body) => {
                let robots = ParsedRobots::from_content(&body);
                tracing::info!(
                    "Loaded robots.txt for {} ({} sitemaps declared)",
                    target.domain(),
                    robots.sitemaps().len()
                );
                Self::new(robots)
            }
            Err(e) => {
                tracing::warn!("Could not read {}: {}; crawling unrestricted", robots_url, e);
                Self::unrestricted()
            }
        }
    }

    /// Checks if the wildcard user agent may fetch a URL
    pub fn can_fetch(&self, url: &str) -> bool {
        self.robots.is_allowed(url, ROBOTS_AGENT)
    }

    /// Sitemap URLs declared in robots.txt
    pub fn sitemaps(&self) -> &[String] {
        self.robots.sitemaps()
    }
}
