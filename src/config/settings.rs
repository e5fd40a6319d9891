//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! [`SynthesisConfig`] is the exception to plain field access: it can only be
//! built through [`SynthesisConfig::new`] (or deserialised through the same
//! validation), so an instance in hand is always in range.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AppPaths;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A configuration value is outside its permitted range.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid speaking rate {0}: must be between 0.25 and 4.0")]
    SpeakingRate(f64),

    #[error("invalid pitch {0}: must be between -20 and 20")]
    Pitch(f64),

    #[error("invalid sample rate {0} Hz")]
    SampleRate(u32),

    #[error("language code must not be empty")]
    EmptyLanguageCode,

    #[error("invalid ASCII ratio {0}: must be between 0.0 and 1.0")]
    AsciiRatio(f64),

    #[error("invalid similarity cutoff {cutoff} for `{list}`: must be between 0.0 and 1.0")]
    Cutoff { list: String, cutoff: f64 },

    #[error("max_attempts must be at least 1")]
    MaxAttempts,
}

// ---------------------------------------------------------------------------
// VoiceGender / AudioEncoding
// ---------------------------------------------------------------------------

/// Voice gender requested from the synthesis service.
///
/// Serialised in the service's wire form (`"MALE"`, `"FEMALE"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceGender {
    Male,
    Female,
    Neutral,
    SsmlVoiceGenderUnspecified,
}

impl Default for VoiceGender {
    fn default() -> Self {
        Self::Male
    }
}

/// Encoding of the audio returned by the synthesis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    /// 16-bit signed little-endian PCM, delivered with a WAV header.
    Linear16,
    Mp3,
    OggOpus,
    Mulaw,
    Alaw,
}

impl Default for AudioEncoding {
    fn default() -> Self {
        Self::Linear16
    }
}

impl AudioEncoding {
    /// MIME type a caller should attach when serving audio in this encoding.
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioEncoding::Linear16 | AudioEncoding::Mulaw | AudioEncoding::Alaw => "audio/x-wav",
            AudioEncoding::Mp3 => "audio/mpeg",
            AudioEncoding::OggOpus => "audio/ogg",
        }
    }
}

// ---------------------------------------------------------------------------
// SynthesisConfig
// ---------------------------------------------------------------------------

/// Voice parameters for the speech synthesis service.
///
/// | Field         | Range          | Default   |
/// |---------------|----------------|-----------|
/// | speaking_rate | 0.25 – 4.0     | 1.0       |
/// | pitch         | -20.0 – 20.0   | 0.0       |
/// | sample_rate   | 8000 – 48000   | 24000     |
///
/// ```
/// use pdf_tts::config::{AudioEncoding, ConfigError, SynthesisConfig, VoiceGender};
///
/// let ok = SynthesisConfig::new(1.5, 0.0, "en-US", VoiceGender::Male, AudioEncoding::Linear16);
/// assert!(ok.is_ok());
///
/// let too_fast = SynthesisConfig::new(5.0, 0.0, "en-US", VoiceGender::Male, AudioEncoding::Linear16);
/// assert_eq!(too_fast.unwrap_err(), ConfigError::SpeakingRate(5.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSynthesisConfig")]
pub struct SynthesisConfig {
    speaking_rate: f64,
    pitch: f64,
    language_code: String,
    gender: VoiceGender,
    encoding: AudioEncoding,
    sample_rate_hertz: u32,
}

impl SynthesisConfig {
    pub const MIN_SPEAKING_RATE: f64 = 0.25;
    pub const MAX_SPEAKING_RATE: f64 = 4.0;
    pub const MIN_PITCH: f64 = -20.0;
    pub const MAX_PITCH: f64 = 20.0;
    /// Sample rate of the audio the pipeline declares to callers.
    pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

    /// Build a validated config at the default 24 kHz sample rate.
    pub fn new(
        speaking_rate: f64,
        pitch: f64,
        language_code: impl Into<String>,
        gender: VoiceGender,
        encoding: AudioEncoding,
    ) -> Result<Self, ConfigError> {
        Self::with_sample_rate(
            speaking_rate,
            pitch,
            language_code,
            gender,
            encoding,
            Self::DEFAULT_SAMPLE_RATE,
        )
    }

    /// Build a validated config with an explicit sample rate.
    pub fn with_sample_rate(
        speaking_rate: f64,
        pitch: f64,
        language_code: impl Into<String>,
        gender: VoiceGender,
        encoding: AudioEncoding,
        sample_rate_hertz: u32,
    ) -> Result<Self, ConfigError> {
        if !(Self::MIN_SPEAKING_RATE..=Self::MAX_SPEAKING_RATE).contains(&speaking_rate) {
            return Err(ConfigError::SpeakingRate(speaking_rate));
        }
        if !(Self::MIN_PITCH..=Self::MAX_PITCH).contains(&pitch) {
            return Err(ConfigError::Pitch(pitch));
        }
        if !(8_000..=48_000).contains(&sample_rate_hertz) {
            return Err(ConfigError::SampleRate(sample_rate_hertz));
        }
        let language_code = language_code.into();
        if language_code.trim().is_empty() {
            return Err(ConfigError::EmptyLanguageCode);
        }
        Ok(Self {
            speaking_rate,
            pitch,
            language_code,
            gender,
            encoding,
            sample_rate_hertz,
        })
    }

    pub fn speaking_rate(&self) -> f64 {
        self.speaking_rate
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    pub fn gender(&self) -> VoiceGender {
        self.gender
    }

    pub fn encoding(&self) -> AudioEncoding {
        self.encoding
    }

    pub fn sample_rate_hertz(&self) -> u32 {
        self.sample_rate_hertz
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            speaking_rate: 1.0,
            pitch: 0.0,
            language_code: "en-US".into(),
            gender: VoiceGender::default(),
            encoding: AudioEncoding::default(),
            sample_rate_hertz: Self::DEFAULT_SAMPLE_RATE,
        }
    }
}

/// Unvalidated mirror of [`SynthesisConfig`] used only for deserialisation.
#[derive(Deserialize)]
#[serde(default)]
struct RawSynthesisConfig {
    speaking_rate: f64,
    pitch: f64,
    language_code: String,
    gender: VoiceGender,
    encoding: AudioEncoding,
    sample_rate_hertz: u32,
}

impl Default for RawSynthesisConfig {
    fn default() -> Self {
        let d = SynthesisConfig::default();
        Self {
            speaking_rate: d.speaking_rate,
            pitch: d.pitch,
            language_code: d.language_code,
            gender: d.gender,
            encoding: d.encoding,
            sample_rate_hertz: d.sample_rate_hertz,
        }
    }
}

impl TryFrom<RawSynthesisConfig> for SynthesisConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSynthesisConfig) -> Result<Self, Self::Error> {
        SynthesisConfig::with_sample_rate(
            raw.speaking_rate,
            raw.pitch,
            raw.language_code,
            raw.gender,
            raw.encoding,
            raw.sample_rate_hertz,
        )
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Connection settings for the speech synthesis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Base URL of the Text-to-Speech REST API.
    pub base_url: String,
    /// API key sent as the `key` query parameter, if any.
    pub api_key: Option<String>,
    /// OAuth access token sent as a bearer token, if any.
    pub access_token: Option<String>,
    /// Maximum seconds to wait for one synthesis response.
    pub timeout_secs: u64,
    /// Total attempts per synthesis (first try included).
    pub max_attempts: u32,
    /// Delay before the first retry; grows linearly per attempt.
    pub retry_delay_ms: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://texttospeech.googleapis.com".into(),
            api_key: None,
            access_token: None,
            timeout_secs: 30,
            max_attempts: 3,
            retry_delay_ms: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// FilterConfig
// ---------------------------------------------------------------------------

/// One fuzzy exclusion list: a file of known-noise lines and the similarity
/// above which a candidate line is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionListConfig {
    /// File name inside the filters directory.
    pub file: String,
    /// Similarity cutoff in `[0.0, 1.0]`.
    pub cutoff: f64,
}

/// Noise filter switches and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Strip `( ... )` spans.
    pub strip_parentheses: bool,
    /// Strip `[ ... ]` spans.
    pub strip_brackets: bool,
    /// Strip `{ ... }` spans.
    pub strip_braces: bool,
    /// Only strip spans whose interior has no alphabetic characters
    /// (citation markers like `[12]`).
    pub strip_only_without_letters: bool,
    pub remove_symbols_and_digits_only: bool,
    pub remove_symbols_only: bool,
    pub remove_digits_only: bool,
    /// Reject lines that are mostly non-ASCII (garbled tables and figures).
    pub remove_majority_non_ascii: bool,
    /// Minimum fraction of ASCII characters a line must have to be kept.
    pub min_ascii_ratio: f64,
    pub remove_urls: bool,
    pub authors: ExclusionListConfig,
    pub references: ExclusionListConfig,
    pub custom: ExclusionListConfig,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            strip_parentheses: true,
            strip_brackets: true,
            strip_braces: true,
            strip_only_without_letters: true,
            remove_symbols_and_digits_only: true,
            remove_symbols_only: true,
            remove_digits_only: true,
            remove_majority_non_ascii: true,
            min_ascii_ratio: 0.85,
            remove_urls: true,
            authors: ExclusionListConfig {
                file: "authors".into(),
                cutoff: 0.4,
            },
            references: ExclusionListConfig {
                file: "references".into(),
                cutoff: 0.05,
            },
            custom: ExclusionListConfig {
                file: "custom".into(),
                cutoff: 0.4,
            },
        }
    }
}

impl FilterConfig {
    /// Check ratio and cutoffs are within `[0.0, 1.0]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_ascii_ratio) {
            return Err(ConfigError::AsciiRatio(self.min_ascii_ratio));
        }
        for list in [&self.authors, &self.references, &self.custom] {
            if !(0.0..=1.0).contains(&list.cutoff) {
                return Err(ConfigError::Cutoff {
                    list: list.file.clone(),
                    cutoff: list.cutoff,
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SegmentConfig
// ---------------------------------------------------------------------------

/// How a freshly segmented document reuses audio from a prior cache of the
/// same length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcileMode {
    /// Reuse audio by index alone, whatever text now sits at that index.
    Positional,
    /// Reuse audio only where the text at that index is unchanged.
    TextVerified,
}

impl Default for ReconcileMode {
    fn default() -> Self {
        Self::Positional
    }
}

/// Segmentation and cache reconciliation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    pub reconcile: ReconcileMode,
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

/// Where documents and exclusion lists live.  `None` means the platform
/// default from [`AppPaths`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub uploads_dir: Option<PathBuf>,
    pub filters_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn uploads_dir(&self) -> PathBuf {
        self.uploads_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().uploads_dir)
    }

    pub fn filters_dir(&self) -> PathBuf {
        self.filters_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().filters_dir)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use pdf_tts::config::AppConfig;
///
/// // Load (returns Default when file is missing, Err when out of range)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub filter: FilterConfig,
    pub segment: SegmentConfig,
    pub synthesis: SynthesisConfig,
    pub tts: TtsConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path and validate every section.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Range checks that deserialisation alone does not cover.
    ///
    /// [`SynthesisConfig`] validates itself on construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.filter.validate()?;
        if self.tts.max_attempts == 0 {
            return Err(ConfigError::MaxAttempts);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
