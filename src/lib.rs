//! ledger-crawl: a domain-scoped, resumable web crawler
//!
//! This crate crawls a fixed set of domains breadth-first, respecting robots.txt,
//! saving the visible text of each page to disk and recording every fetch attempt
//! in an append-only CSV ledger. The ledger doubles as resume state.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
///
/// Per-page failures never surface here; they are recorded in the ledger.
/// These are the errors that stop a run.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::{Config, DuplicateMode};
pub use crawler::{Coordinator, RunReport};
pub use state::{CrawlPhase, PageOutcome};
pub use storage::{CsvLedger, LedgerRecord, PageStore};
pub use url::{normalize_domain, url_in_domain};
