//! Storage module for persisting crawl data
//!
//! This module owns the only durable state of a crawl:
//! - The CSV ledger, one row per fetch attempt
//! - Saved page files, one text file per successfully saved URL
//!
//! Everything else (frontier, visited set) lives for a single run.

mod ledger;
mod pages;
mod traits;

pub use ledger::CsvLedger;
pub use pages::{read_saved_page, url_to_filename, PageStore, SavedPage};
pub use traits::{DedupKey, LedgerStore, StorageError, StorageResult};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Note recorded for URLs disallowed by robots.txt
pub const NOTE_BLOCKED_BY_ROBOTS: &str = "blocked_by_robots";

/// Prefix of the note recorded for non-HTML responses
pub const NOTE_NON_HTML_PREFIX: &str = "non_html:";

/// One row of the crawl ledger
///
/// Column order is fixed: `url, status, timestamp, text_length, file_path, note`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub url: String,
    /// HTTP status, or 0 when no HTTP response was obtained
    pub status: u16,
    pub timestamp: NaiveDate,
    pub text_length: usize,
    pub file_path: String,
    pub note: String,
}

impl LedgerRecord {
    /// A successful save
    pub fn saved(url: &str, text_length: usize, file_path: &str) -> Self {
        Self {
            url: url.to_string(),
            status: 200,
            timestamp: today(),
            text_length,
            file_path: file_path.to_string(),
            note: String::new(),
        }
    }

    /// An attempt that did not save anything
    pub fn attempt(url: &str, status: u16, note: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            status,
            timestamp: today(),
            text_length: 0,
            file_path: String::new(),
            note: note.into(),
        }
    }

    /// A URL disallowed by robots.txt
    pub fn blocked(url: &str) -> Self {
        Self::attempt(url, 0, NOTE_BLOCKED_BY_ROBOTS)
    }

    /// A request that produced no HTTP response
    pub fn network_error(url: &str, error: &str) -> Self {
        Self::attempt(url, 0, error)
    }

    /// A response whose Content-Type is not HTML
    pub fn non_html(url: &str, status: u16, content_type: &str) -> Self {
        Self::attempt(
            url,
            status,
            format!("{}{}", NOTE_NON_HTML_PREFIX, content_type),
        )
    }

    /// Returns true if this row counts toward the Seen-OK set
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// The ledger timestamp: today's local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Destroys all prior crawl output: saved pages and the ledger
///
/// Only invoked at the start of a run in reset mode.
pub fn reset_all(ledger: &mut dyn LedgerStore, pages: &PageStore) -> StorageResult<()> {
    pages.clear()?;
    ledger.reset()?;
    Ok(())
}
