//! Player settings and preferences
//!
//! Persisted as JSON next to the best-run record. Loading never fails: a
//! missing or corrupt file yields defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::highscores::DEFAULT_BEST_RUN_FILE;
use crate::sim::Difficulty;

/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = "dungeon_settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects off
    pub muted: bool,

    // === Blind Duel ===
    /// Warden difficulty when playing against the computer
    pub difficulty: Difficulty,

    // === Determinism ===
    /// Fixed RNG seed; a fresh one is drawn (and logged) when absent
    pub seed: Option<u64>,

    // === Files ===
    /// Classic/Tron best-run record
    pub best_run_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            difficulty: Difficulty::Medium,
            seed: None,
            best_run_path: PathBuf::from(DEFAULT_BEST_RUN_FILE),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::info!("Using default settings ({}: {err})", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring corrupt settings file {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to `path` (best-effort)
    pub fn save(&self, path: &Path) {
        let result = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::other)
            .and_then(|json| fs::write(path, json));
        match result {
            Ok(()) => log::info!("Settings saved to {}", path.display()),
            Err(err) => log::warn!("Failed to save settings to {}: {err}", path.display()),
        }
    }
}
