//! Google Cloud Text-to-Speech REST client.
//!
//! Calls `POST {base_url}/v1/text:synthesize` and decodes the base64
//! `audioContent` of the response.  All connection details come from
//! [`TtsConfig`] and all voice parameters from [`SynthesisConfig`].

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use crate::config::{SynthesisConfig, TtsConfig};

use super::synthesizer::{SpeechSynthesizer, SynthesisError};

#[derive(Deserialize)]
struct SynthesizeResponse {
    #[serde(rename = "audioContent", default)]
    audio_content: Option<String>,
}

/// Synthesises speech through the Cloud Text-to-Speech API.
///
/// # Authentication
/// The API key (`?key=`) and the bearer token are each attached only when
/// configured and non-empty.  Both may be set.
pub struct GoogleTtsClient {
    client: reqwest::Client,
    config: TtsConfig,
    voice: SynthesisConfig,
}

impl GoogleTtsClient {
    /// Build a client from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used if the
    /// builder fails.
    pub fn from_config(config: &TtsConfig, voice: &SynthesisConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        if non_empty(&config.api_key).is_none() && non_empty(&config.access_token).is_none() {
            log::warn!("tts: neither an API key nor an access token is configured");
        }

        Self {
            client,
            config: config.clone(),
            voice: voice.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/text:synthesize",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// JSON body of a synthesis request for `text`.
    pub fn request_body(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "input": { "text": text },
            "voice": {
                "languageCode": self.voice.language_code(),
                "ssmlGender":   self.voice.gender(),
            },
            "audioConfig": {
                "audioEncoding":   self.voice.encoding(),
                "speakingRate":    self.voice.speaking_rate(),
                "pitch":           self.voice.pitch(),
                "sampleRateHertz": self.voice.sample_rate_hertz(),
            }
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError> {
        let mut req = self.client.post(self.endpoint()).json(&self.request_body(text));

        if let Some(key) = non_empty(&self.config.api_key) {
            req = req.query(&[("key", key)]);
        }
        if let Some(token) = non_empty(&self.config.access_token) {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let parsed: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| SynthesisError::Decode(e.to_string()))?;
        let encoded = parsed
            .audio_content
            .filter(|c| !c.is_empty())
            .ok_or(SynthesisError::EmptyAudio)?;
        let audio = STANDARD
            .decode(encoded)
            .map_err(|e| SynthesisError::Decode(e.to_string()))?;
        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }

        log::debug!("tts: synthesised {} chars → {} bytes", text.len(), audio.len());
        Ok(audio)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AudioEncoding, VoiceGender};

    fn client(base_url: &str) -> GoogleTtsClient {
        let tts = TtsConfig {
            base_url: base_url.into(),
            api_key: Some("test-key".into()),
            ..TtsConfig::default()
        };
        let voice = SynthesisConfig::new(
            1.25,
            -2.0,
            "en-GB",
            VoiceGender::Female,
            AudioEncoding::Linear16,
        )
        .unwrap();
        GoogleTtsClient::from_config(&tts, &voice)
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        assert_eq!(
            client("http://localhost:9/").endpoint(),
            "http://localhost:9/v1/text:synthesize"
        );
    }

    #[test]
    fn request_body_uses_wire_names() {
        let body = client("http://localhost:9").request_body("Hello.");
        assert_eq!(body["input"]["text"], "Hello.");
        assert_eq!(body["voice"]["languageCode"], "en-GB");
        assert_eq!(body["voice"]["ssmlGender"], "FEMALE");
        assert_eq!(body["audioConfig"]["audioEncoding"], "LINEAR16");
        assert_eq!(body["audioConfig"]["speakingRate"], 1.25);
        assert_eq!(body["audioConfig"]["pitch"], -2.0);
        assert_eq!(body["audioConfig"]["sampleRateHertz"], 24_000);
    }

    #[test]
    fn response_without_audio_parses_to_none() {
        let parsed: SynthesizeResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.audio_content.is_none());
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transient_error() {
        // Port 9 (discard) on localhost is not listening in test environments.
        let err = client("http://127.0.0.1:9").synthesize("x").await.unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err:?}");
    }

    #[test]
    fn client_is_object_safe() {
        let _: Box<dyn SpeechSynthesizer> = Box::new(client("http://localhost:9"));
    }
}
