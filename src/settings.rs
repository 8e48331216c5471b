//! Cradle settings
//!
//! Backed by the sliders on the page and persisted in LocalStorage.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::CradleError;
use crate::sim::CradleParams;

/// Slider range for the number of balls
pub const BALL_COUNT_RANGE: RangeInclusive<usize> = 2..=5;
/// Slider range for the string length (px)
pub const ROPE_LENGTH_RANGE: RangeInclusive<f32> = 120.0..=240.0;
/// Slider range for the rest gap between balls (px)
pub const GAP_RANGE: RangeInclusive<f32> = 0.0..=40.0;
/// Slider range for gravity (px/s²)
pub const GRAVITY_RANGE: RangeInclusive<f32> = 900.0..=3400.0;

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Cradle ===
    /// Number of balls
    pub ball_count: usize,
    /// String length (px)
    pub rope_length: f32,
    /// Gap between balls at rest (px)
    pub gap: f32,
    /// Gravity (px/s²)
    pub gravity: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Silence collision sounds
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let params = CradleParams::default();
        Self {
            ball_count: params.ball_count,
            rope_length: params.rope_length,
            gap: params.gap,
            gravity: params.gravity,

            master_volume: 0.8,
            muted: false,
        }
    }
}

fn clamp_range(value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

impl Settings {
    /// Every field pulled into its slider range
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        Self {
            ball_count: self
                .ball_count
                .clamp(*BALL_COUNT_RANGE.start(), *BALL_COUNT_RANGE.end()),
            rope_length: clamp_range(self.rope_length, &ROPE_LENGTH_RANGE, defaults.rope_length),
            gap: clamp_range(self.gap, &GAP_RANGE, defaults.gap),
            gravity: clamp_range(self.gravity, &GRAVITY_RANGE, defaults.gravity),
            master_volume: clamp_range(self.master_volume, &(0.0..=1.0), defaults.master_volume),
            muted: self.muted,
        }
    }

    /// Simulation parameters for these settings
    pub fn to_params(&self) -> CradleParams {
        let s = self.clamped();
        CradleParams {
            ball_count: s.ball_count,
            rope_length: s.rope_length,
            gap: s.gap,
            gravity: s.gravity,
            ..CradleParams::default()
        }
    }

    /// Apply one slider by its element id; returns false for unknown ids
    pub fn apply_slider(&mut self, id: &str, value: f32) -> bool {
        match id {
            "ball-count" => self.ball_count = value.round().max(0.0) as usize,
            "rope-length" => self.rope_length = value,
            "gap" => self.gap = value,
            "gravity" => self.gravity = value,
            "volume" => self.master_volume = value,
            _ => return false,
        }
        *self = self.clamped();
        true
    }

    /// Parse settings JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, CradleError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.clamped())
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "newtons_cradle_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::debug!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("no {} store on native, using defaults", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
