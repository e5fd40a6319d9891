//! pdf-tts: turn PDF documents into cached, sentence-level speech.
//!
//! ```text
//! extract ──▶ filter ──▶ segment ──▶ cache ◀──▶ tts
//!    └────────────── pipeline ──────────────────┘
//! ```

pub mod cache;
pub mod config;
pub mod extract;
pub mod filter;
pub mod pipeline;
pub mod segment;
pub mod tts;
