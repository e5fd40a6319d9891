//! Persistent, index-aligned cache of segment text and synthesised audio.
//!
//! Entry `i` of the cache always belongs to segment `i` of the current
//! segmentation.  The cache survives restarts and is reconciled against the
//! fresh segment list on every processing pass.

pub mod entry;
pub mod reconcile;
pub mod store;

use std::path::PathBuf;

use thiserror::Error;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use entry::{count_cached, CacheEntry};
pub use reconcile::{reconcile, ReconcileReport};
pub use store::{SegmentCache, CACHE_FORMAT_VERSION};

/// Errors from the persisted cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialise cache: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The file exists but does not parse.
    #[error("cache file is corrupt: {0}")]
    Corrupt(String),

    #[error("unsupported cache format version {0}")]
    UnsupportedVersion(u32),
}
