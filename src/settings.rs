//! Game settings and preferences
//!
//! Persisted separately from the player profile, as one JSON blob.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError, keys};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum particles drawn per frame for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 24,
            QualityPreset::Medium => 120,
            QualityPreset::High => 400,
        }
    }

    /// Concentric halo rects used to fake a glow
    pub fn glow_layers(&self) -> u32 {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 2,
            QualityPreset::High => 4,
        }
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(format!("unknown quality preset: {other}")),
        }
    }
}

/// On/off options exposed in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    ScreenShake,
    Glow,
    Particles,
    Haptics,
    ReducedMotion,
}

impl Toggle {
    pub const ALL: [Toggle; 5] = [
        Toggle::ScreenShake,
        Toggle::Glow,
        Toggle::Particles,
        Toggle::Haptics,
        Toggle::ReducedMotion,
    ];

    /// Short key, used for the menu control ids
    pub fn key(&self) -> &'static str {
        match self {
            Toggle::ScreenShake => "shake",
            Toggle::Glow => "glow",
            Toggle::Particles => "particles",
            Toggle::Haptics => "haptics",
            Toggle::ReducedMotion => "motion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Toggle::ScreenShake => "Shake",
            Toggle::Glow => "Glow",
            Toggle::Particles => "Particles",
            Toggle::Haptics => "Vibration",
            Toggle::ReducedMotion => "Reduced motion",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on crashes
    pub screen_shake: bool,
    /// Neon glow halos
    pub glow: bool,
    /// Particle effects (debris bursts)
    pub particles: bool,

    // === Feedback ===
    /// Vibrate on level-up, crash and purchase
    pub haptics: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no warp trails)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_shake: true,
            glow: true,
            particles: true,

            haptics: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset has no glow layers to draw
        if preset == QualityPreset::Low {
            self.glow = false;
        }
    }

    pub fn is_on(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::ScreenShake => self.screen_shake,
            Toggle::Glow => self.glow,
            Toggle::Particles => self.particles,
            Toggle::Haptics => self.haptics,
            Toggle::ReducedMotion => self.reduced_motion,
        }
    }

    pub fn flip(&mut self, toggle: Toggle) {
        let flag = match toggle {
            Toggle::ScreenShake => &mut self.screen_shake,
            Toggle::Glow => &mut self.glow,
            Toggle::Particles => &mut self.particles,
            Toggle::Haptics => &mut self.haptics,
            Toggle::ReducedMotion => &mut self.reduced_motion,
        };
        *flag = !*flag;
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Translucent background fade during warps (respects reduced_motion)
    pub fn effective_warp_trails(&self) -> bool {
        !self.reduced_motion
    }

    /// Effective glow layer count
    pub fn glow_layers(&self) -> u32 {
        if !self.glow {
            0
        } else {
            self.quality.glow_layers()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Load settings from the store, defaults when missing or unreadable
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(keys::SETTINGS) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(self).map_err(|e| StoreError::Encode {
            key: keys::SETTINGS.to_string(),
            reason: e.to_string(),
        })?;
        store.set(keys::SETTINGS, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
