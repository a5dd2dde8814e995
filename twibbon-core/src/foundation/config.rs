use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{TwibbonError, TwibbonResult};

/// Environment variable that replaces [`TwibbonConfig::frame_path`].
pub const FRAME_PATH_ENV: &str = "TWIBBON_FRAME_PATH";

/// How the interactive transform is re-projected onto the export surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFit {
    /// Multiply pan and effective scale by `export_size / viewport_width`.
    #[default]
    ViewportRatio,
    /// Recompute the base fit against the export surface, keep the user scale,
    /// and multiply only the pan by `export_size / viewport_width`.
    Refit,
}

/// Fixed texts attached to a share request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShareTexts {
    /// Share sheet title.
    pub title: String,
    /// Body text used when the exported PNG is attached.
    pub file_text: String,
    /// Body text used when only the page link can be shared.
    pub link_text: String,
    /// URL of the page offering the twibbon.
    pub page_url: String,
}

impl Default for ShareTexts {
    fn default() -> Self {
        Self {
            title: "Twibbon Keren!".to_owned(),
            file_text: "Lihat hasil twibbon saya!".to_owned(),
            link_text: "Saya sudah membuat twibbon! Silakan coba juga.".to_owned(),
            page_url: String::new(),
        }
    }
}

/// Session-wide settings.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```json
/// { "frame_path": "frames/event.png", "share": { "page_url": "https://example.org" } }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TwibbonConfig {
    /// Location of the frame overlay image.
    pub frame_path: PathBuf,
    /// Side length of the square export surface, in pixels.
    pub export_size: u32,
    /// File name offered for the downloaded PNG.
    pub download_file_name: String,
    /// Export re-projection policy.
    pub export_fit: ExportFit,
    /// Share sheet texts.
    pub share: ShareTexts,
}

impl Default for TwibbonConfig {
    fn default() -> Self {
        Self {
            frame_path: PathBuf::from("twibbon.png"),
            export_size: 800,
            download_file_name: "twibbon-hasil.png".to_owned(),
            export_fit: ExportFit::default(),
            share: ShareTexts::default(),
        }
    }
}

impl TwibbonConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(s: &str) -> TwibbonResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| TwibbonError::config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_path(path: &Path) -> TwibbonResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Apply `TWIBBON_FRAME_PATH` when it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = std::env::var_os(FRAME_PATH_ENV).filter(|v| !v.is_empty()) {
            self.frame_path = PathBuf::from(path);
        }
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> TwibbonResult<()> {
        if self.export_size == 0 {
            return Err(TwibbonError::config("export_size must be > 0"));
        }
        if u16::try_from(self.export_size).is_err() {
            return Err(TwibbonError::config("export_size must fit in u16"));
        }
        if self.download_file_name.trim().is_empty() {
            return Err(TwibbonError::config("download_file_name must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
