//! Hit-window scoring

use super::state::{Disk, Lane, ScoreState};
use crate::tuning::Tuning;

/// Result of a single lane press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// A disk was in the window; `combo` is the streak after the hit
    Hit { combo: u32 },
    /// Nothing in the window; `broken_combo` is the streak that was lost
    Miss { broken_combo: u32 },
}

/// True if any disk in `lane` sits inside the scoring window
pub fn lane_has_scorable_disk(disks: &[Disk], lane: Lane, tuning: &Tuning) -> bool {
    disks
        .iter()
        .filter(|d| d.lane == lane)
        .any(|d| tuning.in_hit_window(d.distance))
}

/// Judge a press on `lane` and update the counters
///
/// A hit adds exactly one to score and combo. A miss zeroes the combo and
/// restarts the milestone sequence. Disks are left in place either way.
pub fn score_press(
    score: &mut ScoreState,
    disks: &[Disk],
    lane: Lane,
    tuning: &Tuning,
) -> PressOutcome {
    if lane_has_scorable_disk(disks, lane, tuning) {
        score.score += 1;
        score.combo += 1;
        PressOutcome::Hit { combo: score.combo }
    } else {
        let broken_combo = score.combo;
        score.combo = 0;
        score.milestone = 1;
        PressOutcome::Miss { broken_combo }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn disk(lane: Lane, distance: f32) -> Disk {
        Disk {
            id: 1,
            lane,
            distance,
            speed: 5.0,
        }
    }

    #[test]
    fn test_center_hit_at_three() {
        let tuning = Tuning::default();
        let disks = vec![disk(Lane::Center, 3.0)];
        let mut score = ScoreState::default();

        let outcome = score_press(&mut score, &disks, Lane::Center, &tuning);
        assert_eq!(outcome, PressOutcome::Hit { combo: 1 });
        assert_eq!(score.score, 1);
        assert_eq!(score.combo, 1);
    }

    #[test]
    fn test_empty_lane_breaks_combo() {
        let tuning = Tuning::default();
        let disks = vec![disk(Lane::Center, 3.0), disk(Lane::Right, 3.1)];
        let mut score = ScoreState {
            score: 10,
            combo: 3,
            milestone: 2,
        };

        let outcome = score_press(&mut score, &disks, Lane::Left, &tuning);
        assert_eq!(outcome, PressOutcome::Miss { broken_combo: 3 });
        assert_eq!(score.combo, 0);
        assert_eq!(score.milestone, 1);
        assert_eq!(score.score, 10);
    }

    #[test]
    fn test_disk_outside_window_misses() {
        let tuning = Tuning::default();
        let disks = vec![disk(Lane::Left, 2.0), disk(Lane::Left, 4.0)];
        let mut score = ScoreState::default();
        let outcome = score_press(&mut score, &disks, Lane::Left, &tuning);
        assert_eq!(outcome, PressOutcome::Miss { broken_combo: 0 });
    }

    #[test]
    fn test_any_disk_in_window_is_enough() {
        let tuning = Tuning::default();
        let disks = vec![
            disk(Lane::Right, -3.0),
            disk(Lane::Right, 3.35),
            disk(Lane::Right, 5.0),
        ];
        assert!(lane_has_scorable_disk(&disks, Lane::Right, &tuning));
    }

    proptest! {
        #[test]
        fn hit_iff_same_lane_disk_in_window(
            entries in proptest::collection::vec((0usize..3, -7.0f32..6.0), 0..12),
            pressed in 0usize..3,
            prior_combo in 0u32..50,
        ) {
            let tuning = Tuning::default();
            let disks: Vec<Disk> = entries
                .iter()
                .map(|&(lane, distance)| disk(Lane::ALL[lane], distance))
                .collect();
            let lane = Lane::ALL[pressed];
            let expected_hit = entries
                .iter()
                .any(|&(l, d)| l == pressed && (2.75..=3.35).contains(&d));

            let mut score = ScoreState { score: 0, combo: prior_combo, milestone: 1 };
            let outcome = score_press(&mut score, &disks, lane, &tuning);

            if expected_hit {
                prop_assert_eq!(outcome, PressOutcome::Hit { combo: prior_combo + 1 });
                prop_assert_eq!(score.score, 1);
            } else {
                prop_assert_eq!(outcome, PressOutcome::Miss { broken_combo: prior_combo });
                prop_assert_eq!(score.combo, 0);
                prop_assert_eq!(score.score, 0);
            }
        }
    }
}
