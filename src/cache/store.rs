//! On-disk segment cache.
//!
//! # File format
//!
//! ```json
//! { "version": 1, "entries": [ { "text": "...", "audio": "<base64>" | null } ] }
//! ```
//!
//! Saves go to a sibling `*.tmp` file which is flushed to disk and renamed
//! over the target, so a crash mid-write leaves either the old cache or the
//! new one, never a truncated file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::entry::CacheEntry;
use super::CacheError;

/// Current on-disk format version.
pub const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct CacheFileRef<'a> {
    version: u32,
    entries: &'a [CacheEntry],
}

#[derive(Deserialize)]
struct CacheFile {
    version: u32,
    entries: Vec<CacheEntry>,
}

/// Handle to one document's persisted cache file.
#[derive(Debug, Clone)]
pub struct SegmentCache {
    path: PathBuf,
}

impl SegmentCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read the persisted entries.
    ///
    /// `Ok(None)` when no cache file exists; `Err` when it cannot be read or
    /// does not parse.
    pub fn read(&self) -> Result<Option<Vec<CacheEntry>>, CacheError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path).map_err(|e| io_error(&self.path, e))?;
        let file: CacheFile =
            serde_json::from_slice(&bytes).map_err(|e| CacheError::Corrupt(e.to_string()))?;
        if file.version != CACHE_FORMAT_VERSION {
            return Err(CacheError::UnsupportedVersion(file.version));
        }
        Ok(Some(file.entries))
    }

    /// Like [`read`](Self::read) but never fails: an unreadable cache is
    /// logged and treated as absent so it gets rebuilt.
    pub fn load(&self) -> Option<Vec<CacheEntry>> {
        match self.read() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("cache: ignoring {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Persist `entries`.
    ///
    /// With `overwrite == false` nothing is written when a cache file already
    /// exists.  Returns whether the file was written.
    pub fn save(&self, entries: &[CacheEntry], overwrite: bool) -> Result<bool, CacheError> {
        if !overwrite && self.path.exists() {
            return Ok(false);
        }

        let json = serde_json::to_vec(&CacheFileRef {
            version: CACHE_FORMAT_VERSION,
            entries,
        })?;

        let tmp = self.tmp_path();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        {
            let mut file = fs::File::create(&tmp).map_err(|e| io_error(&tmp, e))?;
            file.write_all(&json).map_err(|e| io_error(&tmp, e))?;
            file.sync_all().map_err(|e| io_error(&tmp, e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| io_error(&self.path, e))?;

        log::debug!(
            "cache: saved {} entries to {} (overwrite={overwrite})",
            entries.len(),
            self.path.display()
        );
        Ok(true)
    }

    /// Delete the cache file.  Returns whether a file was removed.
    pub fn remove(&self) -> Result<bool, CacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&self.path, e)),
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> CacheError {
    CacheError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
