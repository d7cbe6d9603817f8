//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep and clock
//! - Seeded RNG only
//! - Stable iteration order (obstacles by insertion, which is also id order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod layout;
pub mod motion;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, ContactDetector, ContactEvent, ContactPhase, EntityId, handle_contact};
pub use layout::{ConfigurationError, Layout};
pub use motion::{advance_obstacles, advance_runner, scroll_ground, try_jump};
pub use scoring::{JumpStart, ScoringMachine, TrackingPhase};
pub use spawner::{Spawner, spawn_due};
pub use state::{
    GameEvent, GamePhase, GameState, Obstacle, ObstacleId, RunConfig, RunnerSprite, RunnerState,
    Sound,
};
pub use tick::{TickInput, tick};
