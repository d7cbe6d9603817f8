//! Obstacle spawner
//!
//! Spawns one obstacle just past the right edge whenever the spawn interval
//! has elapsed on the absolute clock, then redraws the interval.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameState, ObstacleId};

/// Spawn clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Seconds to wait after `last_spawn_time` before the next spawn
    pub spawn_rate: f64,
    /// Absolute clock value of the last spawn (or re-arm)
    pub last_spawn_time: f64,
}

impl Spawner {
    pub fn new(spawn_rate: f64) -> Self {
        Self {
            spawn_rate,
            last_spawn_time: 0.0,
        }
    }

    /// Whether the interval has elapsed at absolute time `now`
    #[inline]
    pub fn is_due(&self, now: f64) -> bool {
        now - self.last_spawn_time >= self.spawn_rate
    }

    /// Restart the clock from `now`
    pub fn rearm(&mut self, now: f64, spawn_rate: f64) {
        self.last_spawn_time = now;
        self.spawn_rate = spawn_rate;
    }

    /// Draw the next interval uniformly from `[min, max)`
    pub fn redraw<R: Rng>(&mut self, rng: &mut R, min: f64, max: f64) -> f64 {
        self.spawn_rate = rng.random_range(min..max);
        self.spawn_rate
    }
}

/// Spawn an obstacle if one is due. No-op unless the run is active.
pub fn spawn_due(state: &mut GameState, now: f64) -> Option<ObstacleId> {
    if !state.is_running() || !state.spawner.is_due(now) {
        return None;
    }

    state.spawner.last_spawn_time = now;
    let (min, max) = (state.config.spawn_rate_min, state.config.spawn_rate_max);
    let next = state.spawner.redraw(&mut state.rng, min, max);

    let x = state.layout.width + state.config.spawn_offscreen_distance;
    let id = state.spawn_obstacle_at(x, now);
    log::debug!("spawned obstacle {:?} at x={x} t={now:.3}, next in {next:.2}s", id);
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::layout::Layout;
    use crate::sim::state::RunConfig;
    use proptest::prelude::*;

    fn state(seed: u64) -> GameState {
        let layout = Layout::with_ground(SCREEN_WIDTH, SCREEN_HEIGHT, GROUND_HEIGHT).unwrap();
        GameState::new(seed, layout, RunConfig::default()).unwrap()
    }

    #[test]
    fn test_not_due_before_rate() {
        let mut state = state(1);
        assert!(spawn_due(&mut state, 1.0).is_none());
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_spawn_when_due() {
        let mut state = state(1);
        let id = spawn_due(&mut state, INITIAL_SPAWN_RATE).expect("due");
        assert_eq!(state.obstacles.len(), 1);
        let obstacle = state.obstacle(id).unwrap();
        assert_eq!(obstacle.pos.x, SCREEN_WIDTH + SPAWN_OFFSCREEN_DISTANCE);
        assert_eq!(obstacle.pos.y, GROUND_HEIGHT);
        assert_eq!(obstacle.spawn_time, INITIAL_SPAWN_RATE);
        assert_eq!(state.spawner.last_spawn_time, INITIAL_SPAWN_RATE);
    }

    #[test]
    fn test_exactly_one_spawn_per_interval() {
        let mut state = state(3);
        assert!(spawn_due(&mut state, 2.0).is_some());
        // Same instant again: the clock was reset, nothing new
        assert!(spawn_due(&mut state, 2.0).is_none());
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_no_spawn_when_over() {
        let mut state = state(1);
        state.game_over();
        assert!(spawn_due(&mut state, 100.0).is_none());
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_same_seed_same_intervals() {
        let mut a = state(99);
        let mut b = state(99);
        let mut now = 0.0;
        for _ in 0..20 {
            now += 4.0;
            spawn_due(&mut a, now);
            spawn_due(&mut b, now);
            assert_eq!(a.spawner.spawn_rate, b.spawner.spawn_rate);
        }
    }

    proptest! {
        #[test]
        fn prop_redrawn_rate_in_range(seed in any::<u64>(), spawns in 1usize..50) {
            let mut state = state(seed);
            let mut now = 0.0;
            for _ in 0..spawns {
                now += state.spawner.spawn_rate + 0.001;
                prop_assert!(spawn_due(&mut state, now).is_some());
                prop_assert!(state.spawner.spawn_rate >= SPAWN_RATE_MIN);
                prop_assert!(state.spawner.spawn_rate < SPAWN_RATE_MAX);
            }
        }
    }
}
