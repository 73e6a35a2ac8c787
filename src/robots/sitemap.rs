//! Sitemap seeding
//!
//! Sitemaps declared in robots.txt are fetched once per domain and their
//! `<loc>` entries become the initial frontier.

use crate::url::{crawl_url, url_in_domain};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Extracts the text of every `<loc>` element
///
/// Namespace prefixes are ignored, so both `<loc>` and `<sm:loc>` match.
/// Entries of a sitemap index are returned as-is.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Trimmed, non-empty locations in document order
/// * `Err(quick_xml::Error)` - The document is not well-formed XML
pub fn parse_sitemap_locs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut locs = Vec::new();
    let mut in_loc = false;
    let mut current = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"loc" => {
                in_loc = true;
                current.clear();
            }
            Event::Text(t) if in_loc => {
                current.push_str(&t.unescape()?);
            }
            Event::CData(c) if in_loc => {
                current.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Event::End(e) if e.local_name().as_ref() == b"loc" => {
                in_loc = false;
                let loc = current.trim();
                if !loc.is_empty() {
                    locs.push(loc.to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(locs)
}

/// Fetches one sitemap and returns its in-domain locations
async fn fetch_sitemap(
    client: &Client,
    sitemap_url: &str,
    domain: &str,
    timeout: Duration,
) -> Result<Vec<String>, String> {
    let response = client
        .get(sitemap_url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status().as_u16()));
    }

    let body = response.text().await.map_err(|e| e.to_string())?;
    let locs = parse_sitemap_locs(&body).map_err(|e| e.to_string())?;

    Ok(locs
        .iter()
        .filter_map(|loc| seed_url(loc))
        .filter(|loc| url_in_domain(loc, domain))
        .collect())
}

/// Brings a `<loc>` value into the form discovered links take
fn seed_url(loc: &str) -> Option<String> {
    Url::parse(loc).ok().and_then(|url| crawl_url(&url))
}

/// Collects seed URLs from every declared sitemap
///
/// A sitemap that cannot be fetched or parsed is skipped with a warning;
/// the others are still used.
///
/// # Arguments
///
/// * `client` - The crawler's HTTP client
/// * `sitemaps` - Sitemap URLs declared in robots.txt
/// * `domain` - Normalized domain the seeds must belong to
/// * `timeout` - Per-sitemap request timeout
pub async fn sitemap_seeds(
    client: &Client,
    sitemaps: &[String],
    domain: &str,
    timeout: Duration,
) -> Vec<String> {
    let mut seeds = Vec::new();

    for sitemap_url in sitemaps {
        match fetch_sitemap(client, sitemap_url, domain, timeout).await {
            Ok(locs) => {
                tracing::info!("Sitemap {} yielded {} in-domain URLs", sitemap_url, locs.len());
                seeds.extend(locs);
            }
            Err(e) => {
                tracing::warn!("Skipping sitemap {}: {}", sitemap_url, e);
            }
        }
    }

    seeds
}
