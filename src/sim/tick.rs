//! Simulation tick
//!
//! Advances the game by one frame. Subsystems run in a fixed order so that
//! scoring always sees this tick's positions and contacts:
//! input → spawn → motion → contacts → scoring.

use super::collision::handle_contact;
use super::motion::{advance_obstacles, advance_runner, scroll_ground, try_jump};
use super::spawner::spawn_due;
use super::state::{GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap/click/space: jump while running, reset while over
    pub jump_or_reset: bool,
    /// Idle/demo mode - jump automatically in front of obstacles
    pub autopilot: bool,
}

/// Advance the game state by `dt` seconds at absolute clock `now`.
///
/// Not reentrant: one call at a time per game.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, now: f64) {
    if input.jump_or_reset {
        match state.phase {
            GamePhase::Over => {
                state.reset(now);
                return;
            }
            GamePhase::Running => {
                try_jump(state);
            }
        }
    }

    // Frozen world: no spawn, no motion, no scoring
    if !state.is_running() {
        return;
    }

    if input.autopilot && autopilot_wants_jump(state) {
        try_jump(state);
    }

    let dt = dt * state.speed;
    state.time += f64::from(dt);

    spawn_due(state, now);

    scroll_ground(state, dt);
    advance_obstacles(state, dt);
    advance_runner(state, dt);

    let runner_box = state.runner.aabb();
    let contacts = state.contacts.detect(&runner_box, &state.obstacles);
    for event in &contacts {
        handle_contact(state, event);
    }
    if !state.is_running() {
        return;
    }

    if state.scoring.update(&state.runner, &state.obstacles) {
        state.award_point();
    }
}

/// Jump when the next obstacle is about to reach the runner.
///
/// Times the jump so the obstacle crosses under the runner around the apex.
fn autopilot_wants_jump(state: &GameState) -> bool {
    let runner = &state.runner;
    if runner.is_airborne {
        return false;
    }

    let air_time = 2.0 * state.config.jump_velocity / state.config.gravity;
    let crossing = runner.size.x + state.config.obstacle_size.x;
    let lead = state.scroll_speed * air_time * 0.5 - crossing * 0.5;

    state
        .obstacles
        .iter()
        .find(|o| o.pos.x >= runner.leading_edge())
        .is_some_and(|o| o.pos.x - runner.leading_edge() <= lead.max(0.0))
}
