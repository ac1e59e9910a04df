//! Game settings
//!
//! Loaded from an optional JSON file; every field falls back to its default.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Environment variable naming a settings file
pub const SETTINGS_ENV: &str = "FRUIT_TAP_SETTINGS";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Spawn tick period (ms)
    pub tick_interval_ms: u64,
    /// Time an untapped target stays up (ms)
    pub auto_hide_ms: u64,

    // === Gameplay ===
    /// Fixed RNG seed; a clock-derived seed is used when absent
    pub seed: Option<u64>,
    /// Hit radius around the target centre (points)
    pub target_radius: f32,

    // === Terminal ===
    /// Frame budget for the render loop (ms)
    pub frame_ms: u64,
    /// Points covered by one terminal column
    pub cell_width: f32,
    /// Points covered by one terminal row
    pub cell_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL.as_millis() as u64,
            auto_hide_ms: AUTO_HIDE_DELAY.as_millis() as u64,

            seed: None,
            target_radius: TARGET_RADIUS,

            frame_ms: 33,
            cell_width: 10.0,
            cell_height: 20.0,
        }
    }
}

impl Settings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn auto_hide_delay(&self) -> Duration {
        Duration::from_millis(self.auto_hide_ms)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`, falling back to defaults on any failure
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings.sanitized()
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace values the game loop cannot run with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.tick_interval_ms == 0 {
            log::warn!("tick_interval_ms must be positive, using default");
            self.tick_interval_ms = defaults.tick_interval_ms;
        }
        if self.frame_ms == 0 {
            self.frame_ms = defaults.frame_ms;
        }
        if !(self.cell_width > 0.0) {
            self.cell_width = defaults.cell_width;
        }
        if !(self.cell_height > 0.0) {
            self.cell_height = defaults.cell_height;
        }
        if !(self.target_radius > 0.0) {
            self.target_radius = defaults.target_radius;
        }
        self
    }
}
