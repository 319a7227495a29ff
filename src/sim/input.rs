//! Per-tick input commands

use super::state::Lane;

/// Latched lane presses, one flag per lane
///
/// Any number of key-downs between two ticks collapse into a single press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputLatch {
    pressed: [bool; 3],
}

impl InputLatch {
    pub fn press(&mut self, lane: Lane) {
        self.pressed[lane.index()] = true;
    }

    pub fn is_pressed(&self, lane: Lane) -> bool {
        self.pressed[lane.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.pressed.iter().any(|&p| p)
    }

    /// Merge another latch into this one
    pub fn merge(&mut self, other: &InputLatch) {
        for lane in Lane::ALL {
            if other.is_pressed(lane) {
                self.press(lane);
            }
        }
    }

    /// Pressed lanes in processing order, clearing the latch
    pub fn take(&mut self) -> Vec<Lane> {
        let lanes = Lane::ALL
            .into_iter()
            .filter(|&lane| self.is_pressed(lane))
            .collect();
        self.pressed = [false; 3];
        lanes
    }

    pub fn clear(&mut self) {
        self.pressed = [false; 3];
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Lane presses since the last tick
    pub lanes: InputLatch,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - a bot presses lanes
    pub autoplay: bool,
}

impl TickInput {
    /// Clear one-shot commands after a tick has consumed them
    pub fn clear_one_shots(&mut self) {
        self.lanes.clear();
        self.pause = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_press_latches_once() {
        let mut latch = InputLatch::default();
        latch.press(Lane::Center);
        latch.press(Lane::Center);
        latch.press(Lane::Center);
        assert_eq!(latch.take(), vec![Lane::Center]);
        assert!(latch.is_empty());
        assert!(latch.take().is_empty());
    }

    #[test]
    fn test_take_is_in_lane_order() {
        let mut latch = InputLatch::default();
        latch.press(Lane::Right);
        latch.press(Lane::Left);
        assert_eq!(latch.take(), vec![Lane::Left, Lane::Right]);
    }

    #[test]
    fn test_clear_one_shots_keeps_autoplay() {
        let mut input = TickInput {
            pause: true,
            autoplay: true,
            ..Default::default()
        };
        input.lanes.press(Lane::Left);
        input.clear_one_shots();
        assert!(input.lanes.is_empty());
        assert!(!input.pause);
        assert!(input.autoplay);
    }
}
