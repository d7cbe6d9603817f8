//! Clearance scoring state machine
//!
//! One obstacle at a time is tracked as "the next one to clear". A point is
//! awarded on the landing edge of a jump when:
//! - the tracked obstacle was still ahead of the runner when it left the ground
//! - its trailing edge is now behind the runner's leading edge
//! - the runner is not touching any obstacle
//!
//! Tracking is released once the obstacle has fully passed a grounded
//! runner, which lets the next obstacle be picked up.

use serde::{Deserialize, Serialize};

use super::state::{Obstacle, ObstacleId, RunnerState};

/// Coarse view of where the machine is in a pass attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingPhase {
    /// No obstacle tracked
    Idle,
    /// An obstacle ahead is tracked, runner on the ground
    Tracking,
    /// Runner in the air; landing will be evaluated
    Airborne,
}

/// Snapshot taken on the first airborne tick of a pass attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpStart {
    /// Tracked obstacle's x when the runner left the ground
    pub obstacle_x: f32,
    /// Runner's leading edge at the same instant
    pub runner_edge: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringMachine {
    pub tracked: Option<ObstacleId>,
    /// Set once per pass attempt; kept until tracking is released
    pub position_at_jump_start: Option<JumpStart>,
    /// Runner was airborne at the previous evaluation (landing edge detector)
    pub jumping: bool,
    /// The tracked obstacle already earned its point
    pub scored: bool,
}

impl ScoringMachine {
    pub fn phase(&self) -> TrackingPhase {
        match (self.tracked, self.jumping) {
            (_, true) => TrackingPhase::Airborne,
            (Some(_), false) => TrackingPhase::Tracking,
            (None, false) => TrackingPhase::Idle,
        }
    }

    /// Run one evaluation step. Returns true when a clearance is scored.
    ///
    /// Must be called after motion and contact handling for the tick so it
    /// sees the current positions and contact state.
    pub fn update(&mut self, runner: &RunnerState, obstacles: &[Obstacle]) -> bool {
        if self.tracked.is_none() {
            self.tracked = obstacles
                .iter()
                .find(|o| o.pos.x > runner.pos.x)
                .map(|o| o.id);
            if let Some(id) = self.tracked {
                log::trace!("tracking obstacle {:?}", id);
            }
        }

        let tracked = self
            .tracked
            .and_then(|id| obstacles.iter().find(|o| o.id == id));

        let mut scored = false;
        if runner.is_airborne {
            self.jumping = true;
            if self.position_at_jump_start.is_none() {
                self.position_at_jump_start = tracked.map(|o| JumpStart {
                    obstacle_x: o.pos.x,
                    runner_edge: runner.leading_edge(),
                });
            }
        } else if self.jumping {
            // Landing edge: evaluated exactly once per jump
            scored = !self.scored && self.cleared(runner, tracked) && !runner.touching_obstacle;
            self.scored |= scored;
            self.jumping = false;
        }

        if !self.jumping && self.tracked.is_some() {
            let passed = tracked.is_none_or(|o| o.trailing_edge() < runner.trailing_edge());
            if passed {
                log::trace!("released obstacle {:?}", self.tracked);
                self.release();
            }
        }

        scored
    }

    /// Geometric half of the clearance test
    fn cleared(&self, runner: &RunnerState, tracked: Option<&Obstacle>) -> bool {
        let (Some(start), Some(obstacle)) = (self.position_at_jump_start, tracked) else {
            return false;
        };
        start.obstacle_x > start.runner_edge && obstacle.trailing_edge() < runner.leading_edge()
    }

    /// Drop the tracked obstacle and its jump snapshot
    pub fn release(&mut self) {
        self.tracked = None;
        self.position_at_jump_start = None;
        self.scored = false;
    }

    /// Full reset for a new run
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
