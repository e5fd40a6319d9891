//! Segmentation of filtered page text into speakable units.
//!
//! A segment is one sentence (or fragment) of a paragraph, or the marker
//! announcing a new page.  Segments are identified by their 0-based position
//! and are what the cache and the synthesis client work on.

pub mod markup;
pub mod segmenter;
pub mod splitter;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use markup::{is_page_marker, page_marker, strip_markup, FORMATTING_TAGS};
pub use segmenter::{filter_page, join_lines, normalize, FilteredPage, Segmentation, Segmenter};
pub use splitter::{PeriodSpaceSplitter, SentenceSplitter};
