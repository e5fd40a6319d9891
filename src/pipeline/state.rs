//! Document status state machine and the in-memory state behind each
//! pipeline's lock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::{count_cached, CacheEntry};
use crate::extract::{DocumentInfo, TocEntry};
use crate::filter::Removals;

// ---------------------------------------------------------------------------
// DocumentStatus
// ---------------------------------------------------------------------------

/// Lifecycle of one document's derived artifacts.
///
/// ```text
/// Unprocessed ──process()──▶ Processing ──ok──▶ Processed ──clean()──▶ Cleaned
///                                 │                  ▲                    │
///                                 └──err──▶ (previous status)             │
///                                                    └─────process()──────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// No segments exist yet.
    #[default]
    Unprocessed,

    /// `process()` is extracting and segmenting.
    Processing,

    /// Segments exist and `stream()` may be called.
    Processed,

    /// Artifacts were deleted by `clean()`.  Equivalent to `Unprocessed`.
    Cleaned,
}

impl DocumentStatus {
    /// ```
    /// use pdf_tts::pipeline::DocumentStatus;
    ///
    /// assert!(DocumentStatus::Processed.is_processed());
    /// assert!(!DocumentStatus::Cleaned.is_processed());
    /// ```
    pub fn is_processed(&self) -> bool {
        *self == DocumentStatus::Processed
    }

    /// A short human-readable label for status output.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentStatus::Unprocessed => "Unprocessed",
            DocumentStatus::Processing => "Processing",
            DocumentStatus::Processed => "Processed",
            DocumentStatus::Cleaned => "Cleaned",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// DocumentState
// ---------------------------------------------------------------------------

/// Everything a pipeline knows about its document between calls.
///
/// `entries` is `Some` exactly when `status` is `Processed`.
#[derive(Debug, Clone, Default)]
pub struct DocumentState {
    pub status: DocumentStatus,
    pub entries: Option<Vec<CacheEntry>>,
    pub info: DocumentInfo,
    pub toc: Vec<TocEntry>,
    pub removals: Removals,
    pub last_updated: Option<DateTime<Utc>>,
}

impl DocumentState {
    /// State of a document that has never been processed.
    pub fn unprocessed(file_name: impl Into<String>) -> Self {
        Self {
            info: DocumentInfo {
                file_name: file_name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// State restored from a persisted cache.
    pub fn restored(file_name: impl Into<String>, entries: Vec<CacheEntry>) -> Self {
        Self {
            status: DocumentStatus::Processed,
            entries: Some(entries),
            ..Self::unprocessed(file_name)
        }
    }

    pub fn num_segments(&self) -> usize {
        self.entries.as_ref().map_or(0, Vec::len)
    }

    pub fn num_cached(&self) -> usize {
        self.entries.as_deref().map_or(0, count_cached)
    }

    pub fn text_list(&self) -> Vec<String> {
        self.entries
            .as_ref()
            .map(|entries| entries.iter().map(|e| e.text.clone()).collect())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_unprocessed() {
        assert_eq!(DocumentStatus::default(), DocumentStatus::Unprocessed);
    }

    #[test]
    fn only_processed_is_processed() {
        assert!(!DocumentStatus::Unprocessed.is_processed());
        assert!(!DocumentStatus::Processing.is_processed());
        assert!(DocumentStatus::Processed.is_processed());
        assert!(!DocumentStatus::Cleaned.is_processed());
    }

    #[test]
    fn status_serialises_lowercase() {
        let json = serde_json::to_string(&DocumentStatus::Processed).unwrap();
        assert_eq!(json, "\"processed\"");
    }

    #[test]
    fn restored_state_counts_entries() {
        let state = DocumentState::restored(
            "doc.pdf",
            vec![CacheEntry::new("a"), CacheEntry::with_audio("b", vec![1])],
        );
        assert_eq!(state.status, DocumentStatus::Processed);
        assert_eq!(state.num_segments(), 2);
        assert_eq!(state.num_cached(), 1);
        assert_eq!(state.text_list(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(state.info.file_name, "doc.pdf");
    }

    #[test]
    fn unprocessed_state_is_empty() {
        let state = DocumentState::unprocessed("x.pdf");
        assert_eq!(state.num_segments(), 0);
        assert_eq!(state.num_cached(), 0);
        assert!(state.text_list().is_empty());
    }
}
