//! Saved page files
//!
//! Each successfully extracted page is written to its own text file in the
//! output directory. The file name is derived from the URL alone, so saving
//! the same URL again replaces the previous copy.

use crate::storage::traits::{StorageError, StorageResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Encoded names longer than this are shortened
const MAX_ENCODED_LEN: usize = 180;

/// Prefix kept from an over-long encoded name
const KEEP_PREFIX_LEN: usize = 120;

/// Hex characters of the digest appended to a shortened name
const DIGEST_SUFFIX_LEN: usize = 16;

/// Derives the file name a URL is saved under
///
/// The URL is percent-encoded with no safe characters so the result
/// contains no path separators. Names that would grow too long keep a prefix
/// plus a digest of the full encoding, which keeps distinct URLs apart.
pub fn url_to_filename(url: &str) -> String {
    let encoded = urlencoding::encode(url);

    if encoded.len() <= MAX_ENCODED_LEN {
        return format!("{}.txt", encoded);
    }

    // Percent-encoding is pure ASCII, so any byte offset is a char boundary
    let digest = hex::encode(Sha256::digest(encoded.as_bytes()));
    format!(
        "{}-{}.txt",
        &encoded[..KEEP_PREFIX_LEN],
        &digest[..DIGEST_SUFFIX_LEN]
    )
}

/// Directory of saved page files
#[derive(Debug, Clone)]
pub struct PageStore {
    dir: PathBuf,
}

impl PageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a URL would be saved under
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(url_to_filename(url))
    }

    /// Writes the extracted text of a page
    ///
    /// The file starts with a `URL: <url>` line and a blank line, followed
    /// by the text. The content goes to a temporary sibling first and is
    /// renamed into place, so a crash never leaves a half-written page
    /// behind the final name.
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the saved file
    /// * `Err(StorageError)` - The directory or file could not be written
    pub fn save(&self, url: &str, text: &str) -> StorageResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(url);
        let tmp = path.with_extension("txt.tmp");
        let content = format!("URL: {}\n\n{}\n", url, text);

        fs::write(&tmp, content)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!("Saved {} to {}", url, path.display());
        Ok(path)
    }

    /// Removes the whole output directory
    pub fn clear(&self) -> StorageResult<()> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {
                tracing::info!("Removed output directory {}", self.dir.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// A page file read back from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPage {
    pub url: String,
    pub text: String,
}

/// Reads a saved page file and recovers its source URL
///
/// The URL comes from the first line, which must start with `URL:`
/// (matched case-insensitively).
pub fn read_saved_page(path: &Path) -> StorageResult<SavedPage> {
    let content = fs::read_to_string(path)?;
    let (first, rest) = content.split_once('\n').unwrap_or((content.as_str(), ""));

    let header = first.trim();
    let has_prefix = header
        .get(..4)
        .map(|p| p.eq_ignore_ascii_case("url:"))
        .unwrap_or(false);
    if !has_prefix {
        return Err(StorageError::MalformedPage(path.to_path_buf()));
    }

    let url = header[4..].trim();
    if url.is_empty() {
        return Err(StorageError::MalformedPage(path.to_path_buf()));
    }

    let text = rest
        .strip_prefix('\n')
        .unwrap_or(rest)
        .trim_end_matches('\n')
        .to_string();

    Ok(SavedPage {
        url: url.to_string(),
        text,
    })
}
