//! Disk spawner

use rand::Rng;

use super::state::{GameEvent, GameState, Lane};
use crate::tuning::Tuning;

/// Roll for a spawn this tick; returns the lane to spawn in, if any
pub fn roll_spawn<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Option<Lane> {
    if rng.random::<f32>() < tuning.spawn_chance {
        Some(Lane::ALL[rng.random_range(0..Lane::ALL.len())])
    } else {
        None
    }
}

/// Possibly spawn one disk, recording a `DiskSpawned` event
pub fn spawn_step(state: &mut GameState) {
    if let Some(lane) = roll_spawn(&mut state.rng, &state.tuning) {
        let id = state.spawn_disk(lane);
        state.events.push(GameEvent::DiskSpawned { id, lane });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_certain_spawn_covers_every_lane() {
        let tuning = Tuning {
            spawn_chance: 1.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [0u32; 3];
        for _ in 0..300 {
            let lane = roll_spawn(&mut rng, &tuning).expect("spawn chance is 1");
            seen[lane.index()] += 1;
        }
        assert!(seen.iter().all(|&n| n > 50), "lanes not uniform: {:?}", seen);
    }

    #[test]
    fn test_zero_chance_never_spawns() {
        let tuning = Tuning {
            spawn_chance: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(7);
        assert!((0..1000).all(|_| roll_spawn(&mut rng, &tuning).is_none()));
    }

    #[test]
    fn test_default_rate_is_about_one_in_ten() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let spawns = (0..10_000)
            .filter(|_| roll_spawn(&mut rng, &tuning).is_some())
            .count();
        assert!((800..1200).contains(&spawns), "got {} spawns", spawns);
    }

    #[test]
    fn test_spawn_step_records_event() {
        let tuning = Tuning {
            spawn_chance: 1.0,
            ..Default::default()
        };
        let mut state = GameState::new(3, tuning);
        spawn_step(&mut state);
        assert_eq!(state.disks.len(), 1);
        let disk = &state.disks[0];
        assert_eq!(
            state.events,
            vec![GameEvent::DiskSpawned {
                id: disk.id,
                lane: disk.lane
            }]
        );
    }
}
