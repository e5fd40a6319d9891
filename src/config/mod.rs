//! Configuration module for pdf-tts.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each pipeline
//! component, `AppPaths` for cross-platform data directories, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.
//!
//! Every value is validated when loaded; an out-of-range speaking rate,
//! pitch, ratio or cutoff is a [`ConfigError`], never silently clamped.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, AudioEncoding, ConfigError, ExclusionListConfig, FilterConfig, ReconcileMode,
    SegmentConfig, StorageConfig, SynthesisConfig, TtsConfig, VoiceGender,
};
