//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a bounded timeout
//! - Visible-text extraction and link discovery
//! - The breadth-first frontier
//! - Overall crawl coordination and reporting

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod parser;
mod report;

pub use coordinator::Coordinator;
pub use extractor::{extract_text, Extraction};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::{Frontier, Rejection};
pub use parser::extract_links;
pub use report::{DomainReport, RunReport};

use crate::config::Config;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client, ledger and page store
/// 2. Apply the duplicate policy (reset mode clears earlier output)
/// 3. Crawl each target domain in turn
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(RunReport)` - Crawl completed
/// * `Err(CrawlError)` - Crawl could not start, or output could not be written
pub async fn crawl(config: Config) -> crate::Result<RunReport> {
    Coordinator::new(config)?.run().await
}
