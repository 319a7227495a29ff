//! Player preferences
//!
//! Read once at startup from the page's config document; never written back.

use serde::{Deserialize, Serialize};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no light shuffle, no pad flash)
    pub reduced_motion: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 0.5,
            sfx_volume: 0.6,
            mute_on_blur: true,
            reduced_motion: false,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Clamp volumes into [0, 1]
    pub fn sanitized(mut self) -> Self {
        for vol in [
            &mut self.master_volume,
            &mut self.music_volume,
            &mut self.sfx_volume,
        ] {
            *vol = if vol.is_finite() { vol.clamp(0.0, 1.0) } else { 0.0 };
        }
        self
    }

    /// Effective music gain
    pub fn effective_music_volume(&self) -> f32 {
        self.master_volume * self.music_volume
    }

    /// Effective sound effect gain
    pub fn effective_sfx_volume(&self) -> f32 {
        self.master_volume * self.sfx_volume
    }

    /// Whether hits reshuffle the light colours (respects reduced_motion)
    pub fn light_shuffle_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// Whether pressed pads flash dark (respects reduced_motion)
    pub fn pad_flash_enabled(&self) -> bool {
        !self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_music_volume_is_half() {
        let settings = Settings::default();
        assert!((settings.effective_music_volume() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sanitize_clamps_volumes() {
        let settings = Settings {
            master_volume: 3.0,
            music_volume: -1.0,
            sfx_volume: f32::INFINITY,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.music_volume, 0.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_reduced_motion_disables_effects() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.light_shuffle_enabled());
        assert!(!settings.pad_flash_enabled());
    }
}
