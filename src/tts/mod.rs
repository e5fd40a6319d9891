//! Speech synthesis for segment text.
//!
//! This module provides:
//! * [`SpeechSynthesizer`]: async trait implemented by all synthesis backends.
//! * [`GoogleTtsClient`]: Cloud Text-to-Speech REST client.
//! * [`RetryingSynthesizer`]: wraps any synthesizer; retries transient errors.
//! * [`wav`]: streaming WAV header helpers.
//! * [`SynthesisError`]: error variants for synthesis.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use pdf_tts::config::AppConfig;
//! use pdf_tts::tts::{strip_markup, GoogleTtsClient, RetryingSynthesizer, SpeechSynthesizer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = GoogleTtsClient::from_config(&config.tts, &config.synthesis);
//!     let synthesizer = RetryingSynthesizer::from_config(client, &config.tts);
//!
//!     let text = strip_markup("<BOLD>Hello<BOLD> world.\n");
//!     let audio = synthesizer.synthesize(&text).await.unwrap();
//!     println!("{} bytes", audio.len());
//! }
//! ```

pub mod google;
pub mod retry;
pub mod synthesizer;
pub mod wav;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use crate::segment::strip_markup;
pub use google::GoogleTtsClient;
pub use retry::RetryingSynthesizer;
pub use synthesizer::{SpeechSynthesizer, SynthesisError};

#[cfg(test)]
pub use synthesizer::{CountingSynthesizer, FailingSynthesizer};
