//! Persisted window layout settings.
//!
//! Each GUI mode stores its window rectangle under its own key, in fractions
//! of the screen so layouts survive resolution changes. The file is TOML;
//! missing files and missing keys fall back to the default layout.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from loading or saving the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("settings serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// A window rectangle in screen fractions, `0.0..=1.0` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Default for WindowRect {
    fn default() -> Self {
        // Centered, covering half the screen.
        Self {
            x: 0.25,
            y: 0.25,
            w: 0.5,
            h: 0.5,
        }
    }
}

/// Window rectangles keyed by GUI mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default)]
    windows: HashMap<String, WindowRect>,
}

impl WindowSettings {
    /// The stored rectangle for `key`, or the default layout if none is
    /// stored.
    pub fn rect(&self, key: &str) -> WindowRect {
        self.windows.get(key).copied().unwrap_or_default()
    }

    /// Stores the rectangle for `key`.
    pub fn set_rect(&mut self, key: &str, rect: WindowRect) {
        self.windows.insert(key.to_owned(), rect);
    }

    /// Loads settings from a TOML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(?path, "no settings file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Saves settings to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
