//! PDF text extraction.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              DocumentExtractor (trait)               │
//! │                                                      │
//! │   PdfExtractor::extract(path)                        │
//! │     ├─ read bytes, SHA-256 → document_id             │
//! │     ├─ lopdf::Document::load_mem (+ decrypt)         │
//! │     ├─ PageLabels::from_document   → page labels     │
//! │     ├─ read_toc                    → outline         │
//! │     └─ extract_text per page       → PageText blocks │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod extractor;
pub mod labels;
mod objects;
pub mod outline;
pub mod types;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use extractor::{DocumentExtractor, ExtractError, PdfExtractor};
pub use labels::{PageLabelRange, PageLabelStyle, PageLabels};
pub use outline::read_toc;
pub use types::{DocumentInfo, ExtractedDocument, PageText, TextBlock, TocEntry};

#[cfg(test)]
pub use extractor::MockExtractor;
