//! Display settings and preferences
//!
//! Loaded from an optional JSON file next to the tuning file. Anything missing
//! or unreadable falls back to defaults.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Display preferences for the terminal front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show key help in the footer
    pub show_help: bool,

    // === Accessibility ===
    /// Reduced motion (no level splash)
    pub reduced_motion: bool,
    /// High contrast mode (monochrome board)
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: false,
            show_help: true,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        load_json_or_default(path)
    }

    /// Effective level splash (respects reduced_motion)
    pub fn effective_splash(&self) -> bool {
        !self.reduced_motion
    }
}

/// Read `path` as JSON, logging and returning `T::default()` on any failure
pub fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not read {}: {}, using defaults", path.display(), e);
            return T::default();
        }
    };

    match serde_json::from_str(&json) {
        Ok(value) => {
            log::info!("Loaded {}", path.display());
            value
        }
        Err(e) => {
            log::warn!("Could not parse {}: {}, using defaults", path.display(), e);
            T::default()
        }
    }
}
