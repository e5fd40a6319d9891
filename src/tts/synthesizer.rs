//! Core `SpeechSynthesizer` trait and its error type.

use async_trait::async_trait;
use thiserror::Error;

// ---------------------------------------------------------------------------
// SynthesisError
// ---------------------------------------------------------------------------

/// Errors that can occur while synthesising one segment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthesisError {
    /// HTTP transport or connection error.
    #[error("TTS request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("TTS request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("TTS service returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// The response body was not the expected JSON or base64.
    #[error("failed to decode TTS response: {0}")]
    Decode(String),

    /// The service answered successfully but without audio.
    #[error("TTS service returned no audio")]
    EmptyAudio,
}

impl SynthesisError {
    /// Transport failures, timeouts, throttling and server errors are worth
    /// retrying; everything else will fail the same way again.
    pub fn is_transient(&self) -> bool {
        match self {
            SynthesisError::Request(_) | SynthesisError::Timeout => true,
            SynthesisError::Status { code, .. } => *code == 429 || *code >= 500,
            SynthesisError::Decode(_) | SynthesisError::EmptyAudio => false,
        }
    }
}

impl From<reqwest::Error> for SynthesisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SynthesisError::Timeout
        } else if e.is_decode() {
            SynthesisError::Decode(e.to_string())
        } else {
            SynthesisError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async text-to-speech: clean text in, encoded audio bytes out.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// behind an `Arc<dyn SpeechSynthesizer>`.  Callers pass text with all
/// formatting tags already removed.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError>;
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Returns `b"audio:" + text` and counts every call.  An optional delay
/// widens race windows in concurrency tests.
#[cfg(test)]
pub struct CountingSynthesizer {
    calls: std::sync::atomic::AtomicUsize,
    texts: std::sync::Mutex<Vec<String>>,
    delay: std::time::Duration,
}

#[cfg(test)]
impl CountingSynthesizer {
    pub fn new() -> Self {
        Self::with_delay(std::time::Duration::ZERO)
    }

    pub fn with_delay(delay: std::time::Duration) -> Self {
        Self {
            calls: std::sync::atomic::AtomicUsize::new(0),
            texts: std::sync::Mutex::new(Vec::new()),
            delay,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Texts received, in call order.
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    pub fn audio_for(text: &str) -> Vec<u8> {
        [b"audio:".as_slice(), text.as_bytes()].concat()
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechSynthesizer for CountingSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.texts.lock().unwrap().push(text.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Self::audio_for(text))
    }
}

/// Always fails with the given error, counting calls.
#[cfg(test)]
pub struct FailingSynthesizer {
    error: SynthesisError,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl FailingSynthesizer {
    pub fn new(error: SynthesisError) -> Self {
        Self {
            error,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechSynthesizer for FailingSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, SynthesisError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Err(self.error.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
