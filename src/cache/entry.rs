//! One cached segment: its text and, once synthesised, its audio.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `(segment text, audio)`; audio is `None` until the segment is first
/// streamed.  Audio is stored base64-encoded on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub text: String,
    #[serde(
        serialize_with = "serialize_audio",
        deserialize_with = "deserialize_audio"
    )]
    pub audio: Option<Vec<u8>>,
}

impl CacheEntry {
    /// An entry without audio.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            audio: None,
        }
    }

    pub fn with_audio(text: impl Into<String>, audio: Vec<u8>) -> Self {
        Self {
            text: text.into(),
            audio: Some(audio),
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }
}

fn serialize_audio<S: Serializer>(audio: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
    match audio {
        Some(bytes) => s.serialize_some(&STANDARD.encode(bytes)),
        None => s.serialize_none(),
    }
}

fn deserialize_audio<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
    let encoded: Option<String> = Option::deserialize(d)?;
    encoded
        .map(|e| STANDARD.decode(e).map_err(serde::de::Error::custom))
        .transpose()
}

/// Number of entries that already carry audio.
pub fn count_cached(entries: &[CacheEntry]) -> usize {
    entries.iter().filter(|e| e.has_audio()).count()
}
