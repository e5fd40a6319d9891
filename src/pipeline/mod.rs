//! Pipeline orchestrator module for pdf-tts.
//!
//! This module composes extraction, filtering, segmentation, the segment
//! cache and speech synthesis into per-document operations.
//!
//! # Architecture
//!
//! ```text
//! DocumentRegistry ──open(dir)──▶ Arc<DocumentPipeline>   (one per document)
//!                                        │
//!                                        ├─ process()  spawn_blocking(extract → filter → segment)
//!                                        │               → reconcile → save cache + meta
//!                                        ├─ stream(i)  cache hit, or synthesize → save cache
//!                                        ├─ clean()    delete all derived artifacts
//!                                        └─ get_data() DocumentSnapshot
//!
//! DocumentState (tokio::sync::Mutex) ←─── held for each operation's critical section
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use pdf_tts::config::AppConfig;
//! use pdf_tts::extract::PdfExtractor;
//! use pdf_tts::pipeline::{DocumentRegistry, PipelineOptions};
//! use pdf_tts::tts::{GoogleTtsClient, RetryingSynthesizer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = GoogleTtsClient::from_config(&config.tts, &config.synthesis);
//!
//!     let registry = DocumentRegistry::new(
//!         Arc::new(PdfExtractor::new()),
//!         Arc::new(RetryingSynthesizer::from_config(client, &config.tts)),
//!         PipelineOptions::from_config(&config),
//!     );
//!
//!     let pipeline = registry.open(Path::new("uploads/1")).unwrap();
//!     pipeline.process().await.unwrap();
//!     let audio = pipeline.stream(0).await.unwrap();
//!     println!("{} bytes", audio.len());
//! }
//! ```

pub mod artifacts;
pub mod registry;
pub mod runner;
pub mod snapshot;
pub mod state;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cache::CacheError;
use crate::extract::ExtractError;
use crate::filter::FilterError;
use crate::tts::SynthesisError;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use artifacts::DocumentArtifacts;
pub use registry::{locate_document, DocumentRegistry};
pub use runner::{DocumentPipeline, PipelineOptions};
pub use snapshot::{DocumentSnapshot, SnapshotInfo};
pub use state::{DocumentState, DocumentStatus};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors surfaced by pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The PDF is missing, malformed or locked.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The cache could not be persisted.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The synthesis service failed; the cache is unchanged.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("document has not been processed yet")]
    NotProcessed,

    #[error("segment {index} out of range (document has {len} segments)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("expected exactly one PDF in {dir}, found {found}")]
    DocumentLayout { dir: PathBuf, found: usize },

    #[error("I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A blocking task panicked or was cancelled, or a snapshot failed to
    /// serialise.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
