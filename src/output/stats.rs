//! Statistics generation from the crawl ledger
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the ledger.

use crate::storage::{LedgerStore, StorageResult, NOTE_BLOCKED_BY_ROBOTS, NOTE_NON_HTML_PREFIX};
use crate::url::domain_of;
use std::collections::{BTreeMap, HashSet};

/// Label used for status-0 rows that are not robots rejections
const NETWORK_ERROR_LABEL: &str = "network_error";

/// Ledger statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerStatistics {
    /// Total number of ledger rows (attempts)
    pub total_rows: usize,

    /// Number of distinct URLs attempted
    pub unique_urls: usize,

    /// Count of rows by HTTP status (0 = no response)
    pub rows_by_status: BTreeMap<u16, usize>,

    /// Seen-OK set size per normalized domain
    pub seen_ok_by_domain: BTreeMap<String, usize>,

    /// Count of rows by note category
    pub notes: BTreeMap<String, usize>,

    /// Sum of `text_length` over rows with a saved file
    pub saved_chars: usize,
}

impl LedgerStatistics {
    /// Distinct URLs with a successful row, over all domains
    pub fn seen_ok_total(&self) -> usize {
        self.seen_ok_by_domain.values().sum()
    }

    pub fn status_count(&self, status: u16) -> usize {
        self.rows_by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Groups a ledger note for reporting
///
/// Network error messages vary per URL, so they collapse into one bucket.
fn note_category(status: u16, note: &str) -> Option<String> {
    if note == NOTE_BLOCKED_BY_ROBOTS {
        Some(NOTE_BLOCKED_BY_ROBOTS.to_string())
    } else if note.starts_with(NOTE_NON_HTML_PREFIX) {
        Some(note.to_string())
    } else if status == 0 {
        Some(NETWORK_ERROR_LABEL.to_string())
    } else {
        None
    }
}

/// Loads statistics from the ledger
///
/// # Arguments
///
/// * `ledger` - The ledger to read
///
/// # Returns
///
/// * `Ok(LedgerStatistics)` - Successfully computed statistics
/// * `Err(StorageError)` - The ledger could not be read
pub fn load_statistics(ledger: &dyn LedgerStore) -> StorageResult<LedgerStatistics> {
    let records = ledger.load_records()?;

    let mut stats = LedgerStatistics {
        total_rows: records.len(),
        ..Default::default()
    };

    let mut urls = HashSet::new();
    let mut ok_urls: HashSet<&str> = HashSet::new();

    for record in &records {
        urls.insert(record.url.as_str());
        *stats.rows_by_status.entry(record.status).or_insert(0) += 1;

        if let Some(category) = note_category(record.status, &record.note) {
            *stats.notes.entry(category).or_insert(0) += 1;
        }

        if record.is_ok() && !record.file_path.is_empty() {
            stats.saved_chars += record.text_length;
        }

        if record.is_ok() && ok_urls.insert(record.url.as_str()) {
            if let Some(domain) = domain_of(&record.url) {
                *stats.seen_ok_by_domain.entry(domain).or_insert(0) += 1;
            }
        }
    }

    stats.unique_urls = urls.len();
    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &LedgerStatistics) {
    println!("=== Crawl Ledger Statistics ===\n");

    println!("Overview:");
    println!("  Total attempts: {}", stats.total_rows);
    println!("  Unique URLs: {}", stats.unique_urls);
    println!("  Saved text: {} chars", stats.saved_chars);
    println!();

    println!("Rows by Status:");
    for (status, count) in &stats.rows_by_status {
        let percentage = if stats.total_rows > 0 {
            (*count as f64 / stats.total_rows as f64) * 100.0
        } else {
            0.0
        };
        let label = if *status == 0 {
            "no response".to_string()
        } else {
            status.to_string()
        };
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
    println!();

    if !stats.seen_ok_by_domain.is_empty() {
        println!("Saved Pages by Domain ({}):", stats.seen_ok_by_domain.len());
        let mut domains: Vec<_> = stats.seen_ok_by_domain.iter().collect();
        domains.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (domain, count) in domains {
            println!("  - {}: {}", domain, count);
        }
        println!();
    }

    if !stats.notes.is_empty() {
        println!("Notes:");
        let mut notes: Vec<_> = stats.notes.iter().collect();
        notes.sort_by(|a, b| b.1.cmp(a.1));

        for (note, count) in notes {
            println!("  {}: {}", note, count);
        }
        println!();
    }

    let ok = stats.status_count(200);
    let success_rate = if stats.total_rows > 0 {
        (ok as f64 / stats.total_rows as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} attempts answered 200)",
        success_rate, ok, stats.total_rows
    );
}
