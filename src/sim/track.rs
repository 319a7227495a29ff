//! Disk tracker: constant-velocity travel and end-of-track removal

use super::state::{Disk, GameEvent};

/// Advance every disk by `speed * dt` and drop those at or past `track_end`
pub fn advance_disks(disks: &mut Vec<Disk>, dt: f32, track_end: f32, events: &mut Vec<GameEvent>) {
    for disk in disks.iter_mut() {
        disk.advance(dt);
    }

    disks.retain(|disk| {
        if disk.distance >= track_end {
            events.push(GameEvent::DiskExpired {
                id: disk.id,
                lane: disk.lane,
            });
            false
        } else {
            true
        }
    });
}
