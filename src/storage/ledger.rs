//! CSV ledger implementation
//!
//! This module provides the append-only CSV implementation of the LedgerStore trait.

use crate::storage::traits::{LedgerStore, StorageError, StorageResult};
use crate::storage::LedgerRecord;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// CSV-backed crawl ledger
///
/// No file handle is kept between calls: each append opens the file in
/// append mode, writes one serialized record, flushes, and closes. An
/// interrupted process therefore leaves at most the rows that were fully
/// written.
#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    /// Opens a ledger at the given path
    ///
    /// The file itself is created lazily by the first append.
    ///
    /// # Returns
    ///
    /// * `Ok(CsvLedger)` - Ledger handle
    /// * `Err(StorageError)` - The path names a directory
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        if path.is_dir() {
            return Err(StorageError::LedgerIsDirectory(path));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the backing file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn needs_header(&self) -> bool {
        fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true)
    }
}

impl LedgerStore for CsvLedger {
    fn append(&mut self, record: &LedgerRecord) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let write_header = self.needs_header();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        let mut file = writer
            .into_inner()
            .map_err(|e| StorageError::Io(e.into_error()))?;
        file.flush()?;
        Ok(())
    }

    fn load_records(&self) -> StorageResult<Vec<LedgerRecord>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for (line, result) in reader.deserialize::<LedgerRecord>().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed ledger row {} in {}: {}",
                        line + 2,
                        self.path.display(),
                        e
                    );
                }
            }
        }

        Ok(records)
    }

    fn reset(&mut self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Removed ledger {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
