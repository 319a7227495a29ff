//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod combo;
pub mod feedback;
pub mod input;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod track;

pub use combo::check_milestone;
pub use feedback::{Feedback, LIGHT_PALETTE, TransientMessage};
pub use input::{InputLatch, TickInput};
pub use scoring::{PressOutcome, lane_has_scorable_disk, score_press};
pub use spawn::{roll_spawn, spawn_step};
pub use state::{Disk, GameEvent, GamePhase, GameState, Lane, ScoreState};
pub use tick::{autoplay_presses, run_frame, tick};
pub use track::advance_disks;
