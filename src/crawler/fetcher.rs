//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests that follow redirects
//! - Classifying the outcome into success, HTTP error, or network error
//!
//! There is no retry logic: every failure is recorded once and the crawl
//! moves on.

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Upper bound on the TCP connect phase
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered 200 and the body was read
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status: u16,
        /// Content-Type header value, empty when absent
        content_type: String,
        /// Page body content
        body: String,
    },

    /// The server answered with anything other than 200
    HttpError {
        /// The HTTP status code
        status: u16,
    },

    /// No HTTP response was obtained (DNS, connect, timeout, body read)
    NetworkError {
        /// Error description, never empty
        error: String,
    },
}

impl FetchResult {
    /// Returns true if the response is eligible for extraction
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use ledger_crawl::config::UserAgentConfig;
/// use ledger_crawl::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "Campus-RAG-Crawler".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact: "crawler@example.edu".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once
///
/// # Outcome Mapping
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200, body read | Success |
/// | Any other HTTP status | HttpError |
/// | Timeout | NetworkError |
/// | DNS or connection failure | NetworkError |
/// | Body could not be read | NetworkError |
///
/// Redirects are followed by the client, so `final_url` may differ from
/// `url`.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return network_error(&e),
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status: status.as_u16(),
        };
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => network_error(&e),
    }
}

/// Describes a transport failure for the ledger note
fn network_error(error: &reqwest::Error) -> FetchResult {
    let detail = error.to_string();
    let error = if error.is_timeout() {
        format!("timeout: {}", detail)
    } else if error.is_connect() {
        format!("connection failed: {}", detail)
    } else if detail.trim().is_empty() {
        "request failed".to_string()
    } else {
        detail
    };

    FetchResult::NetworkError { error }
}
