//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Within a tick
//! the order is fixed: lane presses are scored against the disks as they were
//! drawn last frame, then a disk may spawn, then every disk moves, then the
//! combo milestone is checked and feedback timers run down.

use super::combo::check_milestone;
use super::input::{InputLatch, TickInput};
use super::scoring::{PressOutcome, score_press};
use super::spawn::spawn_step;
use super::state::{Disk, GameEvent, GamePhase, GameState};
use super::track::advance_disks;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::tuning::{MISSED_MESSAGE, Tuning};

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
            }
        }
    }

    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;

    // Idle/demo mode - the bot's presses join the player's
    let mut presses = input.lanes;
    if input.autoplay {
        presses.merge(&autoplay_presses(&state.disks, &state.tuning, dt));
    }

    for lane in presses.take() {
        state.feedback.flash_pad(lane, state.tuning.pad_flash_secs);

        match score_press(&mut state.score, &state.disks, lane, &state.tuning) {
            PressOutcome::Hit { combo } => {
                state.feedback.shuffle_lights(&mut state.rng);
                state.events.push(GameEvent::Hit { lane, combo });
            }
            PressOutcome::Miss { broken_combo } => {
                if broken_combo >= 1 {
                    state
                        .feedback
                        .show_message(MISSED_MESSAGE, state.tuning.missed_message_secs);
                }
                state.events.push(GameEvent::Miss { lane, broken_combo });
            }
        }
    }

    spawn_step(state);

    advance_disks(
        &mut state.disks,
        dt,
        state.tuning.track_end,
        &mut state.events,
    );

    if let Some(phrase) = check_milestone(&mut state.score, &state.tuning) {
        let phrase = phrase.to_string();
        log::info!("Combo {}: {}", state.score.combo, phrase);
        state
            .feedback
            .show_message(phrase.clone(), state.tuning.phrase_message_secs);
        state.events.push(GameEvent::ComboMilestone {
            combo: state.score.combo,
            phrase,
        });
    }

    state.feedback.update(dt);
}

/// Feed one display frame into the fixed-timestep accumulator
///
/// Runs up to `MAX_SUBSTEPS` ticks and returns how many ran. One-shot inputs
/// are consumed by the first tick; a frame too short to tick keeps them latched.
pub fn run_frame(
    state: &mut GameState,
    input: &mut TickInput,
    accumulator: &mut f32,
    dt: f32,
) -> u32 {
    *accumulator += dt.clamp(0.0, MAX_FRAME_DT);

    let mut substeps = 0;
    while *accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
        tick(state, input, SIM_DT);
        *accumulator -= SIM_DT;
        substeps += 1;

        // Clear one-shot inputs after processing
        input.clear_one_shots();
    }

    // Drop backlog the substep cap could not drain
    if substeps == MAX_SUBSTEPS {
        *accumulator = accumulator.min(SIM_DT);
    }

    substeps
}

/// Lanes the demo bot presses this tick
///
/// The bot presses as a disk crosses the middle of the scoring window. A disk
/// moves `speed * dt` per tick, so each disk triggers exactly one press.
pub fn autoplay_presses(disks: &[Disk], tuning: &Tuning, dt: f32) -> InputLatch {
    let center = tuning.hit_window_center();
    let mut latch = InputLatch::default();

    for disk in disks {
        let step = disk.speed * dt;
        if disk.distance >= center
            && disk.distance < center + step
            && tuning.in_hit_window(disk.distance)
        {
            latch.press(disk.lane);
        }
    }

    latch
}
