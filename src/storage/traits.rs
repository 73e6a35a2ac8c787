//! Storage traits and error types
//!
//! This module defines the trait interface for ledger backends and
//! associated error types.

use crate::storage::LedgerRecord;
use crate::url::{canonical_url, domain_of};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Ledger path is a directory: {0}")]
    LedgerIsDirectory(PathBuf),

    #[error("Saved page {0} has no URL header")]
    MalformedPage(PathBuf),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// How downstream consumers collapse repeated ledger rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupKey {
    /// One row per exact URL string
    #[default]
    Url,
    /// One row per canonical URL (ignores `www.`, trailing slash, query)
    Canonical,
}

/// Trait for crawl ledger implementations
///
/// A ledger is an append-only record of fetch attempts. Besides auditing, it
/// is the crawler's only memory across runs: the Seen-OK set of a domain is
/// rebuilt from it at the start of every domain crawl.
pub trait LedgerStore {
    /// Durably appends one record
    ///
    /// Creates the backing store (with a header) on first use.
    fn append(&mut self, record: &LedgerRecord) -> StorageResult<()>;

    /// Reads every well-formed record in append order
    ///
    /// A store that does not exist yet yields no records.
    fn load_records(&self) -> StorageResult<Vec<LedgerRecord>>;

    /// Deletes the backing store entirely
    fn reset(&mut self) -> StorageResult<()>;

    /// Loads the Seen-OK set for a domain
    ///
    /// Keeps status-200 rows whose URL's normalized host equals `domain`.
    /// An unreadable store degrades to an empty history.
    ///
    /// # Returns
    ///
    /// The set of URLs and its size
    fn load_seen(&self, domain: &str) -> (HashSet<String>, usize) {
        let records = match self.load_records() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Ledger unreadable, assuming no prior history: {}", e);
                return (HashSet::new(), 0);
            }
        };

        let urls: HashSet<String> = records
            .into_iter()
            .filter(|r| r.is_ok())
            .filter(|r| domain_of(&r.url).as_deref() == Some(domain))
            .map(|r| r.url)
            .collect();

        let count = urls.len();
        (urls, count)
    }

    /// Records the indexing collaborator should embed
    ///
    /// Status-200 rows with a file path, one per dedup key. The latest row
    /// for a key wins (its file is the one on disk) while the order follows
    /// the first appearance of each key.
    fn embeddable_records(&self, dedup: DedupKey) -> StorageResult<Vec<LedgerRecord>> {
        let mut rows: Vec<LedgerRecord> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for record in self.load_records()? {
            if !record.is_ok() || record.file_path.trim().is_empty() {
                continue;
            }

            let key = match dedup {
                DedupKey::Url => record.url.clone(),
                DedupKey::Canonical => {
                    canonical_url(&record.url).unwrap_or_else(|_| record.url.clone())
                }
            };

            match index.get(&key) {
                Some(&i) => rows[i] = record,
                None => {
                    index.insert(key, rows.len());
                    rows.push(record);
                }
            }
        }

        Ok(rows)
    }
}
