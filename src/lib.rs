//! Dino Runner - a single-screen endless runner core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, contacts, scoring, game state)
//! - `settings`: JSON-loadable run configuration
//!
//! Rendering, textures and audio are not implemented here. The simulation
//! emits [`sim::GameEvent`] intents that a presentation layer consumes.

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default screen dimensions (points)
    pub const SCREEN_WIDTH: f32 = 1334.0;
    pub const SCREEN_HEIGHT: f32 = 750.0;
    /// Ground tile height plus the home-indicator padding
    pub const GROUND_HEIGHT: f32 = 74.0;

    /// Default horizontal scroll speed (pixels/s)
    pub const SCROLL_SPEED: f32 = 300.0;

    /// Spawn interval for the first obstacle of a run (seconds)
    pub const INITIAL_SPAWN_RATE: f64 = 1.5;
    /// Redrawn spawn interval range, half-open `[min, max)` (seconds)
    pub const SPAWN_RATE_MIN: f64 = 1.0;
    pub const SPAWN_RATE_MAX: f64 = 3.5;
    /// How far past the right edge new obstacles appear
    pub const SPAWN_OFFSCREEN_DISTANCE: f32 = 50.0;

    /// Downward acceleration applied to an airborne runner (pixels/s²)
    pub const GRAVITY: f32 = 2940.0;
    /// Upward velocity imparted by a jump (pixels/s). Air time is 2v/g = 0.6s.
    pub const JUMP_VELOCITY: f32 = 882.0;

    /// Runner bounding box
    pub const RUNNER_WIDTH: f32 = 30.0;
    pub const RUNNER_HEIGHT: f32 = 40.0;
    /// Runner x as a fraction of the screen width
    pub const RUNNER_X_FRACTION: f32 = 0.15;

    /// Obstacle bounding box
    pub const OBSTACLE_WIDTH: f32 = 20.0;
    pub const OBSTACLE_HEIGHT: f32 = 40.0;

    /// Width of one looping ground tile
    pub const GROUND_TILE_WIDTH: f32 = 600.0;
}

/// Format the score label the way the HUD shows it
#[inline]
pub fn score_text(score: u64) -> String {
    format!("Score: {score}")
}
