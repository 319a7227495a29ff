//! Visual feedback state driven by hits and misses
//!
//! Timers count down in simulation time, so a paused game holds its flashes
//! and messages where they are.

use rand::Rng;
use rand::seq::SliceRandom;

use super::state::Lane;

/// Colours of the six coloured point lights, in rig order
pub const LIGHT_PALETTE: [u32; 6] = [0x00ffff, 0xff00ff, 0xffff00, 0x0000ff, 0xff0000, 0x00ff00];

/// A message that clears itself after a delay
#[derive(Debug, Clone, PartialEq)]
pub struct TransientMessage {
    pub text: String,
    /// Seconds until the message clears
    pub remaining: f32,
}

/// Feedback emitter state
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    /// Current colour of each point light
    pub light_colors: [u32; 6],
    /// Seconds each lane's pad stays dark
    pub pad_flash: [f32; 3],
    /// Text in the message region, if any
    pub message: Option<TransientMessage>,
    /// Hits reshuffle the lights
    pub light_shuffle: bool,
    /// Presses darken the pad
    pub pad_flash_enabled: bool,
}

impl Default for Feedback {
    fn default() -> Self {
        Self {
            light_colors: LIGHT_PALETTE,
            pad_flash: [0.0; 3],
            message: None,
            light_shuffle: true,
            pad_flash_enabled: true,
        }
    }
}

impl Feedback {
    /// Randomly permute the light colours
    pub fn shuffle_lights<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.light_shuffle {
            self.light_colors.shuffle(rng);
        }
    }

    /// Darken a lane's pad for `secs`
    pub fn flash_pad(&mut self, lane: Lane, secs: f32) {
        if self.pad_flash_enabled {
            self.pad_flash[lane.index()] = secs;
        }
    }

    /// Whether a lane's pad is currently dark
    pub fn pad_is_dark(&self, lane: Lane) -> bool {
        self.pad_flash[lane.index()] > 0.0
    }

    /// Replace the current message; the new one owns its own timer
    pub fn show_message(&mut self, text: impl Into<String>, secs: f32) {
        self.message = Some(TransientMessage {
            text: text.into(),
            remaining: secs,
        });
    }

    /// Text currently on screen
    pub fn message_text(&self) -> &str {
        self.message.as_ref().map(|m| m.text.as_str()).unwrap_or("")
    }

    /// Count timers down, clearing anything that ran out
    pub fn update(&mut self, dt: f32) {
        for timer in &mut self.pad_flash {
            if *timer > 0.0 {
                *timer = (*timer - dt).max(0.0);
            }
        }

        let expired = match &mut self.message {
            Some(message) => {
                message.remaining -= dt;
                message.remaining <= 0.0
            }
            None => false,
        };
        if expired {
            self.message = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut feedback = Feedback::default();
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..20 {
            feedback.shuffle_lights(&mut rng);
            let mut colors = feedback.light_colors;
            colors.sort_unstable();
            let mut palette = LIGHT_PALETTE;
            palette.sort_unstable();
            assert_eq!(colors, palette);
        }
    }

    #[test]
    fn test_shuffle_disabled_keeps_order() {
        let mut feedback = Feedback {
            light_shuffle: false,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        feedback.shuffle_lights(&mut rng);
        assert_eq!(feedback.light_colors, LIGHT_PALETTE);
    }

    #[test]
    fn test_pad_flash_expires() {
        let mut feedback = Feedback::default();
        feedback.flash_pad(Lane::Right, 0.02);
        assert!(feedback.pad_is_dark(Lane::Right));
        assert!(!feedback.pad_is_dark(Lane::Left));
        feedback.update(0.015);
        assert!(feedback.pad_is_dark(Lane::Right));
        feedback.update(0.015);
        assert!(!feedback.pad_is_dark(Lane::Right));
    }

    #[test]
    fn test_message_clears_after_delay() {
        let mut feedback = Feedback::default();
        feedback.show_message("Missed!", 0.75);
        feedback.update(0.5);
        assert_eq!(feedback.message_text(), "Missed!");
        feedback.update(0.3);
        assert_eq!(feedback.message_text(), "");
    }

    #[test]
    fn test_new_message_gets_its_own_timer() {
        let mut feedback = Feedback::default();
        feedback.show_message("Missed!", 0.75);
        feedback.update(0.5);
        feedback.show_message("Perfect!", 2.0);
        feedback.update(0.5);
        assert_eq!(feedback.message_text(), "Perfect!");
    }
}
