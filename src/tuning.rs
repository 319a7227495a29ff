//! Data-driven game balance
//!
//! Every gameplay constant lives here so a page can override it through the
//! embedded config document. Defaults reproduce the stock game.

use serde::{Deserialize, Serialize};

/// Default celebratory phrases, shown in order at each combo milestone
pub const DEFAULT_COMBO_PHRASES: [&str; 4] = [
    "Perfect!",
    "You're getting good at this!",
    "Go for it!!",
    "Smooth as butter!",
];

/// Message shown when a combo is broken
pub const MISSED_MESSAGE: &str = "Missed!";

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Probability of spawning a disk on any given tick
    pub spawn_chance: f32,
    /// Disk travel speed (platform units per second)
    pub disk_speed: f32,
    /// Travel distance a new disk starts at (behind the visible end of the track)
    pub spawn_distance: f32,
    /// Disks are removed once their distance reaches this value
    pub track_end: f32,
    /// Lower bound of the scoring window (inclusive)
    pub hit_window_min: f32,
    /// Upper bound of the scoring window (inclusive)
    pub hit_window_max: f32,
    /// A phrase is announced when combo == milestone_multiple * milestone index
    pub milestone_multiple: u32,
    /// Seconds a pressed lane pad stays dark
    pub pad_flash_secs: f32,
    /// Seconds the "Missed!" message stays up
    pub missed_message_secs: f32,
    /// Seconds a combo phrase stays up
    pub phrase_message_secs: f32,
    /// Rotating milestone phrases
    pub combo_phrases: Vec<String>,
    /// Lateral x offsets of the left, center and right lanes
    pub lane_offsets: [f32; 3],
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_chance: 0.1,
            disk_speed: 5.0,
            spawn_distance: -7.0,
            track_end: 6.0,
            hit_window_min: 2.75,
            hit_window_max: 3.35,
            milestone_multiple: 5,
            pad_flash_secs: 0.02,
            missed_message_secs: 0.75,
            phrase_message_secs: 2.0,
            combo_phrases: DEFAULT_COMBO_PHRASES.iter().map(|p| p.to_string()).collect(),
            lane_offsets: [-1.2, 0.0, 1.2],
        }
    }
}

impl Tuning {
    /// Clamp values into ranges the simulation can run with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.spawn_chance.is_finite() {
            self.spawn_chance = defaults.spawn_chance;
        }
        self.spawn_chance = self.spawn_chance.clamp(0.0, 1.0);

        // Disks only ever move forward
        if !self.disk_speed.is_finite() || self.disk_speed <= 0.0 {
            self.disk_speed = defaults.disk_speed;
        }

        if !self.spawn_distance.is_finite()
            || !self.track_end.is_finite()
            || self.spawn_distance >= self.track_end
        {
            self.spawn_distance = defaults.spawn_distance;
            self.track_end = defaults.track_end;
        }

        if !self.hit_window_min.is_finite()
            || !self.hit_window_max.is_finite()
            || self.hit_window_min > self.hit_window_max
        {
            self.hit_window_min = defaults.hit_window_min;
            self.hit_window_max = defaults.hit_window_max;
        }

        self.milestone_multiple = self.milestone_multiple.max(1);

        for secs in [
            &mut self.pad_flash_secs,
            &mut self.missed_message_secs,
            &mut self.phrase_message_secs,
        ] {
            if !secs.is_finite() || *secs < 0.0 {
                *secs = 0.0;
            }
        }

        if self.combo_phrases.is_empty() {
            self.combo_phrases = defaults.combo_phrases;
        }

        if self.lane_offsets.iter().any(|x| !x.is_finite()) {
            self.lane_offsets = defaults.lane_offsets;
        }

        self
    }

    /// True if a travel distance falls inside the closed scoring window
    #[inline]
    pub fn in_hit_window(&self, distance: f32) -> bool {
        distance >= self.hit_window_min && distance <= self.hit_window_max
    }

    /// Midpoint of the scoring window
    #[inline]
    pub fn hit_window_center(&self) -> f32 {
        (self.hit_window_min + self.hit_window_max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_closed_interval() {
        let tuning = Tuning::default();
        assert!(tuning.in_hit_window(2.75));
        assert!(tuning.in_hit_window(3.35));
        assert!(tuning.in_hit_window(3.0));
        assert!(!tuning.in_hit_window(2.7499));
        assert!(!tuning.in_hit_window(3.3501));
    }

    #[test]
    fn test_sanitize_restores_broken_values() {
        let tuning = Tuning {
            spawn_chance: 4.0,
            disk_speed: -1.0,
            hit_window_min: 5.0,
            hit_window_max: 1.0,
            milestone_multiple: 0,
            combo_phrases: Vec::new(),
            pad_flash_secs: f32::NAN,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(tuning.spawn_chance, 1.0);
        assert_eq!(tuning.disk_speed, 5.0);
        assert_eq!(tuning.hit_window_min, 2.75);
        assert_eq!(tuning.hit_window_max, 3.35);
        assert_eq!(tuning.milestone_multiple, 1);
        assert_eq!(tuning.combo_phrases.len(), DEFAULT_COMBO_PHRASES.len());
        assert_eq!(tuning.pad_flash_secs, 0.0);
    }

    #[test]
    fn test_defaults_survive_sanitize() {
        assert_eq!(Tuning::default().sanitized(), Tuning::default());
    }
}
