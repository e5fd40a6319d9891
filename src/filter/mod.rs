//! Heuristic noise filter.
//!
//! Decides, line by line, whether extracted text is content worth reading
//! aloud or boilerplate: citation markers, page furniture, garbled tables,
//! links and author-list fragments.
//!
//! # Quick start
//!
//! ```rust
//! use pdf_tts::config::FilterConfig;
//! use pdf_tts::filter::{NoiseFilter, RemovalCategory};
//!
//! let mut filter = NoiseFilter::without_lists(&FilterConfig::default());
//! assert_eq!(filter.classify("see [3]").as_deref(), Some("see "));
//! assert_eq!(filter.classify("www.example.com"), None);
//! assert_eq!(filter.removals().count(RemovalCategory::Url), 1);
//! ```

pub mod exclusion;
pub mod noise;
pub mod removals;
pub mod rules;
pub mod similarity;

use std::path::PathBuf;

use thiserror::Error;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use exclusion::ExclusionList;
pub use noise::{NoiseFilter, Verdict};
pub use removals::{RemovalCategory, Removals};
pub use rules::BracketStripper;
pub use similarity::{ratio, SimilarityMatcher};

/// Errors raised while preparing the filter.
#[derive(Debug, Error)]
pub enum FilterError {
    /// An exclusion list could not be read or created.
    #[error("exclusion list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
