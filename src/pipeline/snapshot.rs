//! Metadata snapshot returned by `get_data()` and persisted as
//! `<stem>.meta.json`.
//!
//! ```json
//! {
//!   "info": { "file_name": "...", "document_id": "...", "page_count": 12,
//!             "is_encrypted": false, "needs_password": false,
//!             "status": "processed", "is_processed": true,
//!             "num_segments": 240, "num_cached": 17,
//!             "last_updated": "2026-01-01T12:00:00Z" },
//!   "toc": [ { "level": 1, "title": "Introduction", "page": 1 } ],
//!   "text_list": [ "..." ],
//!   "removals": { "url": [ "www.example.com" ] }
//! }
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::{DocumentInfo, TocEntry};
use crate::filter::Removals;

use super::state::{DocumentState, DocumentStatus};
use super::PipelineError;

/// Document info plus the live pipeline counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    #[serde(flatten)]
    pub document: DocumentInfo,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub is_processed: bool,
    #[serde(default)]
    pub num_segments: usize,
    #[serde(default)]
    pub num_cached: usize,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSnapshot {
    pub info: SnapshotInfo,
    pub toc: Vec<TocEntry>,
    pub text_list: Vec<String>,
    pub removals: Removals,
}

impl DocumentSnapshot {
    /// Snapshot of the live state alone.
    pub fn from_state(state: &DocumentState) -> Self {
        Self {
            info: SnapshotInfo {
                document: state.info.clone(),
                status: state.status,
                is_processed: state.status.is_processed(),
                num_segments: state.num_segments(),
                num_cached: state.num_cached(),
                last_updated: state.last_updated,
            },
            toc: state.toc.clone(),
            text_list: state.text_list(),
            removals: state.removals.clone(),
        }
    }

    /// Overlay `state` on a previously persisted snapshot.
    ///
    /// Status and counters always come from the live state.  Document info,
    /// table of contents, removals and the timestamp come from the live state
    /// when it has them (after a `process()` in this session) and from the
    /// persisted copy otherwise.
    pub fn overlay(persisted: Self, state: &DocumentState) -> Self {
        let live = Self::from_state(state);
        let has_live_document = !state.info.document_id.is_empty();

        let mut document = if has_live_document {
            live.info.document
        } else {
            persisted.info.document
        };
        if !state.info.file_name.is_empty() {
            document.file_name = state.info.file_name.clone();
        }

        Self {
            info: SnapshotInfo {
                document,
                last_updated: live.info.last_updated.or(persisted.info.last_updated),
                ..live.info
            },
            toc: if has_live_document { live.toc } else { persisted.toc },
            text_list: if state.entries.is_some() {
                live.text_list
            } else {
                persisted.text_list
            },
            removals: if has_live_document {
                live.removals
            } else {
                persisted.removals
            },
        }
    }

    /// Read a persisted snapshot.  Missing or unreadable files yield `None`
    /// (logged), since the snapshot is informational only.
    pub fn load(path: &Path) -> Option<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("pipeline: cannot read {}: {e}", path.display());
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::warn!("pipeline: ignoring malformed {}: {e}", path.display());
                None
            }
        }
    }

    /// Persist as pretty JSON, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| PipelineError::Internal(format!("serialising snapshot: {e}")))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        fs::write(path, json).map_err(|e| PipelineError::io(path, e))
    }
}
