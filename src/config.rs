//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a valid config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::error::{KeepsakeError, KeepsakeResult};

/// Font files per role. Missing entries fall back to metric-only layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Body face.
    pub regular: Option<PathBuf>,
    /// Bold body face.
    pub bold: Option<PathBuf>,
    /// Handwritten/display face.
    pub display: Option<PathBuf>,
}

/// Fixed strings drawn by the templates.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Branding {
    /// Large footer wordmark (tall polaroid only).
    pub wordmark: String,
    /// Footer tagline under the wordmark.
    pub tagline: String,
    /// Small watermark drawn on every export.
    pub watermark: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            wordmark: "keepsake".to_owned(),
            tagline: "a song for someone you love".to_owned(),
            watermark: "made with keepsake".to_owned(),
        }
    }
}

/// Top-level engine settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub fonts: FontConfig,
    pub branding: Branding,
    /// Album art / background fetch timeout.
    pub fetch_timeout_ms: u64,
    /// Fetched assets larger than this are rejected.
    pub max_asset_bytes: usize,
    /// Quiet period before a crop change is recomposed.
    pub crop_debounce_ms: u64,
    /// Export calls closer than this to the previous accepted one are dropped.
    pub export_debounce_ms: u64,
    /// Delay before a sink's staging file is released.
    pub staging_release_ms: u64,
    /// Seed for every grain texture.
    pub grain_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fonts: FontConfig::default(),
            branding: Branding::default(),
            fetch_timeout_ms: 10_000,
            max_asset_bytes: 20 * 1024 * 1024,
            crop_debounce_ms: 180,
            export_debounce_ms: 700,
            staging_release_ms: 250,
            grain_seed: 0x6b65_6570,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> KeepsakeResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| KeepsakeError::validation(format!("engine config: {e}")))
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> KeepsakeResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn crop_debounce(&self) -> Duration {
        Duration::from_millis(self.crop_debounce_ms)
    }

    pub fn export_debounce(&self) -> Duration {
        Duration::from_millis(self.export_debounce_ms)
    }

    pub fn staging_release(&self) -> Duration {
        Duration::from_millis(self.staging_release_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
