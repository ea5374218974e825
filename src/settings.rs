/// Application settings
///
/// Read once at startup from `settings.json` in the user's config directory:
/// - Linux: ~/.config/image-compressor/settings.json
/// - macOS: ~/Library/Application Support/image-compressor/settings.json
/// - Windows: %APPDATA%\image-compressor\settings.json
///
/// Missing fields take their defaults. The file is never written.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::codec::compressor::DEFAULT_CONVERT_SIZE;
use crate::codec::CompressOptions;
use crate::error::SettingsError;
use crate::state::Quality;

/// Longest accepted delay; anything above is clamped
const MAX_DELAY_MS: u64 = 5_000;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Quality the slider starts at
    pub default_quality: Quality,
    /// How long a finished compression is held before it is shown
    pub min_display_delay_ms: u64,
    /// Length of the closing transition
    pub close_delay_ms: u64,
    /// Keep the original when re-encoding would make it larger
    pub strict: bool,
    /// PNG inputs above this size are converted to JPEG
    pub convert_size: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_quality: Quality::default(),
            min_display_delay_ms: 500,
            close_delay_ms: 350,
            strict: true,
            convert_size: DEFAULT_CONVERT_SIZE,
        }
    }
}

impl Settings {
    /// Load from the default location, falling back to defaults on any problem
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::from_path(&path) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(e) => {
                warn!(path = %path.display(), "ignoring settings file: {}", e);
                Self::default()
            }
        }
    }

    /// Read and validate settings from `path`
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse settings JSON; out-of-range values are clamped
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.validated())
    }

    /// Get the path where settings are read from
    fn settings_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("image-compressor");
        path.push("settings.json");
        Some(path)
    }

    fn validated(mut self) -> Self {
        self.min_display_delay_ms = self.min_display_delay_ms.min(MAX_DELAY_MS);
        self.close_delay_ms = self.close_delay_ms.min(MAX_DELAY_MS);
        self
    }

    pub fn min_display_delay(&self) -> Duration {
        Duration::from_millis(self.min_display_delay_ms)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    /// Compression options for a request at `quality`
    pub fn compress_options(&self, quality: Quality) -> CompressOptions {
        CompressOptions {
            quality,
            strict: self.strict,
            convert_size: self.convert_size,
        }
    }
}
