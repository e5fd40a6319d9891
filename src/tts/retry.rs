//! Retrying synthesizer: wraps any [`SpeechSynthesizer`] and retries
//! transient failures with a linear back-off.
//!
//! Permanent failures (4xx other than 429, undecodable responses, empty
//! audio) are returned on the first attempt.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::TtsConfig;

use super::synthesizer::{SpeechSynthesizer, SynthesisError};

// ---------------------------------------------------------------------------
// RetryingSynthesizer
// ---------------------------------------------------------------------------

/// A transparent wrapper that re-issues a synthesis after a transient error.
///
/// Attempt `n` (1-based) that fails transiently is followed by a sleep of
/// `delay * n` before attempt `n + 1`, up to `max_attempts` attempts in total.
///
/// # Example
/// ```rust
/// use pdf_tts::config::{SynthesisConfig, TtsConfig};
/// use pdf_tts::tts::{GoogleTtsClient, RetryingSynthesizer};
///
/// let tts = TtsConfig::default();
/// let inner = GoogleTtsClient::from_config(&tts, &SynthesisConfig::default());
/// let synthesizer = RetryingSynthesizer::from_config(inner, &tts);
/// assert_eq!(synthesizer.max_attempts(), 3);
/// ```
pub struct RetryingSynthesizer<S: SpeechSynthesizer> {
    inner: S,
    max_attempts: u32,
    delay: Duration,
}

impl<S: SpeechSynthesizer> RetryingSynthesizer<S> {
    /// Wrap `inner`.  `max_attempts` is clamped to at least one.
    pub fn new(inner: S, max_attempts: u32, delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Wrap `inner` with the attempt count and back-off from `config`.
    pub fn from_config(inner: S, config: &TtsConfig) -> Self {
        Self::new(
            inner,
            config.max_attempts,
            Duration::from_millis(config.retry_delay_ms),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Return a reference to the wrapped synthesizer.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SpeechSynthesizer + Send + Sync> SpeechSynthesizer for RetryingSynthesizer<S> {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        let mut attempt = 1;
        loop {
            match self.inner.synthesize(text).await {
                Ok(audio) => return Ok(audio),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let wait = self.delay * attempt;
                    log::warn!(
                        "tts: attempt {attempt}/{} failed ({err}); retrying in {} ms",
                        self.max_attempts,
                        wait.as_millis()
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(err) => {
                    log::error!("tts: synthesis failed after {attempt} attempt(s): {err}");
                    return Err(err);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
