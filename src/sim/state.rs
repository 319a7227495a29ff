//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::feedback::Feedback;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Disks spawn and travel, input is scored
    Playing,
    /// Game is paused
    Paused,
}

/// One of the three scoring positions on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Left,
    Center,
    Right,
}

impl Lane {
    /// All lanes, in the order input is processed
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Center => 1,
            Lane::Right => 2,
        }
    }

    /// Keyboard key bound to this lane
    pub fn key(self) -> &'static str {
        match self {
            Lane::Left => "a",
            Lane::Center => "s",
            Lane::Right => "d",
        }
    }

    /// Map a `KeyboardEvent.key` value to a lane
    pub fn from_key(key: &str) -> Option<Lane> {
        match key {
            "a" | "A" => Some(Lane::Left),
            "s" | "S" => Some(Lane::Center),
            "d" | "D" => Some(Lane::Right),
            _ => None,
        }
    }

    /// Lateral x offset of the lane on the platform
    #[inline]
    pub fn offset(self, tuning: &Tuning) -> f32 {
        tuning.lane_offsets[self.index()]
    }
}

/// A disk travelling down the platform
#[derive(Debug, Clone, PartialEq)]
pub struct Disk {
    pub id: u32,
    pub lane: Lane,
    /// Distance along the platform (increases over time)
    pub distance: f32,
    /// Units per second
    pub speed: f32,
}

impl Disk {
    /// Constant-velocity step
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.distance += self.speed * dt;
    }
}

/// Score, combo and milestone counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreState {
    /// Total hits (monotonic)
    pub score: u64,
    /// Consecutive hits since the last miss
    pub combo: u32,
    /// 1-based index of the next milestone phrase
    pub milestone: u32,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            score: 0,
            combo: 0,
            milestone: 1,
        }
    }
}

/// Things that happened during a tick, for audio and logging
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    DiskSpawned { id: u32, lane: Lane },
    DiskExpired { id: u32, lane: Lane },
    /// Lane pressed with a disk in the window; `combo` is the new streak
    Hit { lane: Lane, combo: u32 },
    /// Lane pressed with nothing in the window; `broken_combo` is the lost streak
    Miss { lane: Lane, broken_combo: u32 },
    ComboMilestone { combo: u32, phrase: String },
    Paused,
    Resumed,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn and light-shuffle randomness
    pub rng: Pcg32,
    /// Gameplay constants for this run
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Active disks (spawn order, ascending id)
    pub disks: Vec<Disk>,
    /// Score and combo counters
    pub score: ScoreState,
    /// Lights, pad flashes and transient message
    pub feedback: Feedback,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Playing,
            time_ticks: 0,
            disks: Vec::new(),
            score: ScoreState::default(),
            feedback: Feedback::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put a fresh disk at the start of the given lane
    pub fn spawn_disk(&mut self, lane: Lane) -> u32 {
        let id = self.next_entity_id();
        self.disks.push(Disk {
            id,
            lane,
            distance: self.tuning.spawn_distance,
            speed: self.tuning.disk_speed,
        });
        id
    }

    /// Apply player preferences that change feedback behaviour
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.feedback.light_shuffle = settings.light_shuffle_enabled();
        self.feedback.pad_flash_enabled = settings.pad_flash_enabled();
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_keys_round_trip() {
        for lane in Lane::ALL {
            assert_eq!(Lane::from_key(lane.key()), Some(lane));
        }
        assert_eq!(Lane::from_key("S"), Some(Lane::Center));
        assert_eq!(Lane::from_key("f"), None);
    }

    #[test]
    fn test_lane_offsets() {
        let tuning = Tuning::default();
        assert_eq!(Lane::Left.offset(&tuning), -1.2);
        assert_eq!(Lane::Center.offset(&tuning), 0.0);
        assert_eq!(Lane::Right.offset(&tuning), 1.2);
    }

    #[test]
    fn test_spawn_uses_tuning() {
        let mut state = GameState::new(1, Tuning::default());
        let a = state.spawn_disk(Lane::Right);
        let b = state.spawn_disk(Lane::Left);
        assert!(b > a);
        assert_eq!(state.disks[0].distance, -7.0);
        assert_eq!(state.disks[0].speed, 5.0);
        assert_eq!(state.disks[0].lane, Lane::Right);
    }

    #[test]
    fn test_reduced_motion_settings() {
        let mut state = GameState::new(1, Tuning::default());
        state.apply_settings(&Settings {
            reduced_motion: true,
            ..Default::default()
        });
        assert!(!state.feedback.light_shuffle);
        assert!(!state.feedback.pad_flash_enabled);
    }

    #[test]
    fn test_score_state_starts_at_first_milestone() {
        let score = ScoreState::default();
        assert_eq!((score.score, score.combo, score.milestone), (0, 0, 1));
    }
}
