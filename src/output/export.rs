//! Embedding index export
//!
//! Writes the record set the indexing collaborator consumes: one row per
//! saved page, deduplicated, pointing at the text file to embed.

use crate::storage::{DedupKey, LedgerStore, StorageResult};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// One row of the exported index
#[derive(Debug, Serialize)]
struct IndexRow<'a> {
    url: &'a str,
    timestamp: String,
    text_length: usize,
    file_path: &'a str,
    note: &'a str,
}

/// Writes the embeddable records of a ledger as CSV
///
/// Columns: `url,timestamp,text_length,file_path,note`.
///
/// # Arguments
///
/// * `ledger` - The ledger to read
/// * `dedup` - How repeated rows are collapsed
/// * `path` - Destination file, replaced if it exists
///
/// # Returns
///
/// * `Ok(usize)` - Number of rows written
/// * `Err(StorageError)` - The ledger could not be read or the file written
pub fn export_index(ledger: &dyn LedgerStore, dedup: DedupKey, path: &Path) -> StorageResult<usize> {
    let records = ledger.embeddable_records(dedup)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in &records {
        writer.serialize(IndexRow {
            url: &record.url,
            timestamp: record.timestamp.format("%Y-%m-%d").to_string(),
            text_length: record.text_length,
            file_path: &record.file_path,
            note: &record.note,
        })?;
    }
    writer.flush()?;

    tracing::info!("Exported {} records to {}", records.len(), path.display());
    Ok(records.len())
}
