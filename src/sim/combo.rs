//! Combo milestone announcer

use super::state::ScoreState;
use crate::tuning::Tuning;

/// Announce the next phrase if the combo sits exactly on the current milestone
///
/// A milestone is reached when `combo == milestone_multiple * milestone`. The
/// phrase list wraps, so long streaks cycle through it again.
pub fn check_milestone<'a>(score: &mut ScoreState, tuning: &'a Tuning) -> Option<&'a str> {
    if score.combo == 0 || tuning.combo_phrases.is_empty() {
        return None;
    }
    if score.combo != tuning.milestone_multiple.saturating_mul(score.milestone) {
        return None;
    }

    let index = (score.milestone as usize - 1) % tuning.combo_phrases.len();
    score.milestone += 1;
    Some(tuning.combo_phrases[index].as_str())
}
