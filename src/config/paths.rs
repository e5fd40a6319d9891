//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings + exclusion lists):
//!   Windows: %APPDATA%\pdf-tts\
//!   macOS:   ~/Library/Application Support/pdf-tts/
//!   Linux:   ~/.config/pdf-tts/
//!
//! Data dir (uploaded documents and their derived artifacts):
//!   Windows: %LOCALAPPDATA%\pdf-tts\
//!   macOS:   ~/Library/Application Support/pdf-tts/
//!   Linux:   ~/.local/share/pdf-tts/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and the `filters/` folder.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory holding the `authors`, `references` and `custom` lists.
    pub filters_dir: PathBuf,
    /// Root directory with one sub-directory per uploaded document.
    pub uploads_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "pdf-tts";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        Self::under(
            dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")),
            dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")),
        )
    }

    /// Lay the application directories out below explicit base directories.
    pub fn under(config_base: impl Into<PathBuf>, data_base: impl Into<PathBuf>) -> Self {
        let config_dir = config_base.into().join(Self::APP_NAME);
        Self {
            settings_file: config_dir.join("settings.toml"),
            filters_dir: config_dir.join("filters"),
            uploads_dir: data_base.into().join(Self::APP_NAME).join("uploads"),
            config_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn layout_below_base_directories() {
        let paths = AppPaths::under("/cfg", "/data");
        assert_eq!(paths.config_dir, Path::new("/cfg/pdf-tts"));
        assert_eq!(paths.settings_file, Path::new("/cfg/pdf-tts/settings.toml"));
        assert_eq!(paths.filters_dir, Path::new("/cfg/pdf-tts/filters"));
        assert_eq!(paths.uploads_dir, Path::new("/data/pdf-tts/uploads"));
    }

    #[test]
    fn platform_paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.uploads_dir.ends_with("uploads"));
        assert!(paths.filters_dir.starts_with(&paths.config_dir));
    }
}
