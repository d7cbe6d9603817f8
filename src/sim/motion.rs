//! Motion system
//!
//! Scrolls ground and obstacles left at the scroll speed and integrates the
//! runner's jump arc. The ground is a floor: landing zeroes velocity.

use glam::Vec2;

use super::state::{GameEvent, GameState, ObstacleId, Sound};

/// Apply a jump impulse if the runner is standing on the ground.
///
/// Returns false (and changes nothing) when airborne or when the run is not
/// active.
pub fn try_jump(state: &mut GameState) -> bool {
    if !state.is_running() {
        return false;
    }
    let runner = &mut state.runner;
    if runner.pos.y > state.ground_height || runner.vel.y > 0.0 {
        return false;
    }

    runner.vel.y = state.config.jump_velocity;
    state.jumps += 1;
    log::debug!("jump #{} from x={}", state.jumps, runner.pos.x);
    state.emit(GameEvent::PlaySound(Sound::Jump));
    true
}

/// Integrate the runner under gravity and clamp it to the ground.
///
/// Semi-implicit Euler: velocity first, then position.
pub fn advance_runner(state: &mut GameState, dt: f32) {
    let ground = state.ground_height;
    let gravity = state.config.gravity;
    let runner = &mut state.runner;

    if runner.pos.y <= ground && runner.vel.y <= 0.0 {
        runner.pos.y = ground;
        runner.vel = Vec2::ZERO;
        runner.is_airborne = false;
        return;
    }

    runner.vel.y -= gravity * dt;
    runner.pos += runner.vel * dt;

    if runner.pos.y <= ground {
        runner.pos.y = ground;
        runner.vel = Vec2::ZERO;
    }
    runner.is_airborne = runner.pos.y > ground;
}

/// Scroll obstacles left and drop the ones fully past the left edge
pub fn advance_obstacles(state: &mut GameState, dt: f32) -> Vec<ObstacleId> {
    let dx = state.scroll_speed * dt;
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= dx;
    }

    let mut removed = Vec::new();
    state.obstacles.retain(|o| {
        let keep = o.trailing_edge() >= 0.0;
        if !keep {
            removed.push(o.id);
        }
        keep
    });

    for &id in &removed {
        log::debug!("despawned obstacle {:?}", id);
        state.emit(GameEvent::ObstacleDespawned { id });
    }
    removed
}

/// Advance the looping ground offset
pub fn scroll_ground(state: &mut GameState, dt: f32) {
    let dx = state.scroll_speed * dt;
    if dx <= 0.0 {
        return;
    }
    state.ground_offset = (state.ground_offset + dx) % state.config.ground_tile_width;
    state.emit(GameEvent::GroundScrolled { dx: -dx });
}
