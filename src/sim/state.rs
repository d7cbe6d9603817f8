//! Game state and core simulation types
//!
//! The controller owns every piece of mutable run state: runner, obstacles,
//! score, spawner clock, contact memory and the scoring state machine.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, ContactDetector};
use super::layout::{ConfigurationError, Layout};
use super::scoring::ScoringMachine;
use super::spawner::Spawner;
use crate::consts::*;
use crate::score_text;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (speed scalar 1)
    Running,
    /// Run ended (speed scalar 0), waiting for a reset tap
    Over,
}

/// Stable obstacle identity, allocated in spawn order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

/// Sounds the presentation layer is asked to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    Jump,
    Death,
}

/// Runner sprite cycle requested from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerSprite {
    /// Two-frame running animation
    Running,
    Dead,
}

/// Intents emitted for the render/audio collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlaySound(Sound),
    /// New text for the score label
    ScoreText(String),
    RunnerSprite(RunnerSprite),
    /// "Tap to Restart" label visibility
    ResetPrompt { visible: bool },
    ObstacleSpawned { id: ObstacleId },
    ObstacleDespawned { id: ObstacleId },
    /// Move the ground node by `dx` (negative: leftward)
    GroundScrolled { dx: f32 },
}

/// Tunables for one run. Everything has a default so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Horizontal scroll speed of ground and obstacles (pixels/s)
    pub scroll_speed: f32,
    /// Interval before the first spawn of a run (seconds)
    pub initial_spawn_rate: f64,
    /// Redrawn spawn interval is uniform in `[spawn_rate_min, spawn_rate_max)`
    pub spawn_rate_min: f64,
    pub spawn_rate_max: f64,
    /// Distance past the right edge at which obstacles appear
    pub spawn_offscreen_distance: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub runner_size: Vec2,
    /// Runner x as a fraction of the screen width
    pub runner_x_fraction: f32,
    pub obstacle_size: Vec2,
    /// Obstacle base height above the ground surface
    pub obstacle_ground_offset: f32,
    pub ground_tile_width: f32,
    /// End the run on the first obstacle contact. Off by default: contacts
    /// only suppress scoring.
    pub collision_ends_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scroll_speed: SCROLL_SPEED,
            initial_spawn_rate: INITIAL_SPAWN_RATE,
            spawn_rate_min: SPAWN_RATE_MIN,
            spawn_rate_max: SPAWN_RATE_MAX,
            spawn_offscreen_distance: SPAWN_OFFSCREEN_DISTANCE,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            runner_size: Vec2::new(RUNNER_WIDTH, RUNNER_HEIGHT),
            runner_x_fraction: RUNNER_X_FRACTION,
            obstacle_size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            obstacle_ground_offset: 0.0,
            ground_tile_width: GROUND_TILE_WIDTH,
            collision_ends_run: false,
        }
    }
}

impl RunConfig {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigurationError {
            ConfigurationError::InvalidSetting {
                name,
                reason: reason.into(),
            }
        }

        if !(self.scroll_speed > 0.0) {
            return Err(invalid("scroll_speed", "must be positive"));
        }
        if !(self.spawn_rate_min > 0.0 && self.spawn_rate_min < self.spawn_rate_max) {
            return Err(invalid(
                "spawn_rate_min",
                format!(
                    "need 0 < min < max, got [{}, {})",
                    self.spawn_rate_min, self.spawn_rate_max
                ),
            ));
        }
        if !(self.initial_spawn_rate >= 0.0) {
            return Err(invalid("initial_spawn_rate", "must not be negative"));
        }
        if !(self.gravity > 0.0) {
            return Err(invalid("gravity", "must be positive"));
        }
        if !(self.jump_velocity > 0.0) {
            return Err(invalid("jump_velocity", "must be positive"));
        }
        if !(self.runner_size.x > 0.0 && self.runner_size.y > 0.0) {
            return Err(invalid("runner_size", "must be positive"));
        }
        if !(self.obstacle_size.x > 0.0 && self.obstacle_size.y > 0.0) {
            return Err(invalid("obstacle_size", "must be positive"));
        }
        if !(0.0..1.0).contains(&self.runner_x_fraction) {
            return Err(invalid("runner_x_fraction", "must be in [0, 1)"));
        }
        if !(self.ground_tile_width > 0.0) {
            return Err(invalid("ground_tile_width", "must be positive"));
        }
        Ok(())
    }
}

/// The player character. `pos` is the bottom-left corner of its box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerState {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub is_airborne: bool,
    /// True while overlapping at least one obstacle
    pub touching_obstacle: bool,
    /// Open contacts (begin events without a matching end)
    pub contact_count: u32,
}

impl RunnerState {
    pub fn new(x: f32, ground: f32, size: Vec2) -> Self {
        Self {
            pos: Vec2::new(x, ground),
            vel: Vec2::ZERO,
            size,
            is_airborne: false,
            touching_obstacle: false,
            contact_count: 0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Back edge (left side)
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.pos.x
    }

    /// Front edge (right side, facing the obstacles)
    #[inline]
    pub fn leading_edge(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// A scrolling obstacle. `pos` is the bottom-left corner of its box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub pos: Vec2,
    pub size: Vec2,
    /// Simulation clock value when it was spawned
    pub spawn_time: f64,
}

impl Obstacle {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Right side: the last part of the obstacle to pass the runner
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub layout: Layout,
    pub config: RunConfig,
    /// Ground surface, resolved once from the layout
    pub ground_height: f32,
    pub phase: GamePhase,
    /// Uniform speed multiplier for every moving entity (0 halts the world)
    pub speed: f32,
    /// Live scroll speed (restored from config on reset)
    pub scroll_speed: f32,
    pub score: u64,
    /// Simulated seconds spent running
    pub time: f64,
    pub runner: RunnerState,
    /// Active obstacles in spawn order; the front is the next to despawn
    pub obstacles: Vec<Obstacle>,
    /// Ground scroll offset in `[0, ground_tile_width)`
    pub ground_offset: f32,
    pub spawner: Spawner,
    pub scoring: ScoringMachine,
    pub contacts: ContactDetector,
    /// Run statistics
    pub jumps: u32,
    pub obstacles_spawned: u32,
    /// Pending intents for the presentation layer. Every active tick pushes
    /// at least a `GroundScrolled`; the host must call `drain_events` once per
    /// frame or this grows without bound.
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Build a running game on a layout whose ground is already computed
    pub fn new(seed: u64, layout: Layout, config: RunConfig) -> Result<Self, ConfigurationError> {
        let ground_height = layout.ground_height()?;
        config.validate()?;

        let runner = RunnerState::new(
            layout.width * config.runner_x_fraction,
            ground_height,
            config.runner_size,
        );

        log::debug!(
            "new game: seed={seed} layout={}x{} ground={ground_height}",
            layout.width,
            layout.height
        );

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            spawner: Spawner::new(config.initial_spawn_rate),
            scroll_speed: config.scroll_speed,
            layout,
            config,
            ground_height,
            phase: GamePhase::Running,
            speed: 1.0,
            score: 0,
            time: 0.0,
            runner,
            obstacles: Vec::new(),
            ground_offset: 0.0,
            scoring: ScoringMachine::default(),
            contacts: ContactDetector::default(),
            jumps: 0,
            obstacles_spawned: 0,
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running && self.speed > 0.0
    }

    /// Where the runner stands when grounded
    pub fn runner_home(&self) -> Vec2 {
        Vec2::new(
            self.layout.width * self.config.runner_x_fraction,
            self.ground_height,
        )
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Place a new obstacle with its left edge at `x`, sitting on the ground
    pub fn spawn_obstacle_at(&mut self, x: f32, now: f64) -> ObstacleId {
        let id = self.next_entity_id();
        let y = self.ground_height + self.config.obstacle_ground_offset;
        self.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(x, y),
            size: self.config.obstacle_size,
            spawn_time: now,
        });
        self.obstacles_spawned += 1;
        self.emit(GameEvent::ObstacleSpawned { id });
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending intents
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Count one clean clearance
    pub fn award_point(&mut self) {
        self.score += 1;
        log::info!("clearance scored, score={}", self.score);
        self.emit(GameEvent::ScoreText(score_text(self.score)));
    }

    /// Stop the world. Everything freezes in place until `reset`.
    pub fn game_over(&mut self) {
        if self.phase == GamePhase::Over {
            return;
        }
        self.phase = GamePhase::Over;
        self.speed = 0.0;
        log::info!("game over: score={} time={:.2}s", self.score, self.time);
        self.emit(GameEvent::PlaySound(Sound::Death));
        self.emit(GameEvent::RunnerSprite(RunnerSprite::Dead));
        self.emit(GameEvent::ResetPrompt { visible: true });
    }

    /// Start a fresh run at clock value `now`
    pub fn reset(&mut self, now: f64) {
        self.phase = GamePhase::Running;
        self.speed = 1.0;
        self.scroll_speed = self.config.scroll_speed;
        self.score = 0;
        self.time = 0.0;
        self.jumps = 0;
        self.obstacles_spawned = 0;
        self.obstacles.clear();
        self.ground_offset = 0.0;
        self.spawner.rearm(now, self.config.initial_spawn_rate);
        self.scoring.reset();
        self.contacts.clear();

        let home = self.runner_home();
        self.runner = RunnerState::new(home.x, home.y, self.config.runner_size);

        log::info!("run reset at t={now:.3}");
        self.emit(GameEvent::ScoreText(score_text(0)));
        self.emit(GameEvent::ResetPrompt { visible: false });
        self.emit(GameEvent::RunnerSprite(RunnerSprite::Running));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout::with_ground(SCREEN_WIDTH, SCREEN_HEIGHT, GROUND_HEIGHT).unwrap()
    }

    #[test]
    fn test_new_requires_ground() {
        let layout = Layout::new(800.0, 600.0).unwrap();
        let err = GameState::new(1, layout, RunConfig::default()).unwrap_err();
        assert_eq!(err, ConfigurationError::GroundHeightUnset);
    }

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7, layout(), RunConfig::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.speed, 1.0);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.runner.pos.y, GROUND_HEIGHT);
        assert!((state.runner.pos.x - SCREEN_WIDTH * RUNNER_X_FRACTION).abs() < 1e-3);
        assert!(!state.runner.is_airborne);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RunConfig {
            spawn_rate_min: 3.0,
            spawn_rate_max: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(1, layout(), config),
            Err(ConfigurationError::InvalidSetting { name: "spawn_rate_min", .. })
        ));
    }

    #[test]
    fn test_entity_ids_are_unique_and_ordered() {
        let mut state = GameState::new(1, layout(), RunConfig::default()).unwrap();
        let a = state.spawn_obstacle_at(500.0, 0.0);
        let b = state.spawn_obstacle_at(900.0, 0.0);
        assert!(a < b);
        assert_eq!(state.obstacles[0].id, a);
        assert_eq!(state.obstacle(b).map(|o| o.pos.x), Some(900.0));
    }

    #[test]
    fn test_obstacle_sits_on_ground() {
        let mut state = GameState::new(1, layout(), RunConfig::default()).unwrap();
        let id = state.spawn_obstacle_at(500.0, 0.0);
        let obstacle = state.obstacle(id).unwrap();
        assert_eq!(obstacle.pos.y, GROUND_HEIGHT);
        assert_eq!(obstacle.trailing_edge(), 500.0 + OBSTACLE_WIDTH);
    }

    #[test]
    fn test_game_over_emits_intents_once() {
        let mut state = GameState::new(1, layout(), RunConfig::default()).unwrap();
        state.game_over();
        state.game_over();
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.speed, 0.0);
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::PlaySound(Sound::Death),
                GameEvent::RunnerSprite(RunnerSprite::Dead),
                GameEvent::ResetPrompt { visible: true },
            ]
        );
    }

    #[test]
    fn test_reset_round_trip() {
        let mut state = GameState::new(1, layout(), RunConfig::default()).unwrap();
        state.spawn_obstacle_at(500.0, 0.0);
        state.score = 12;
        state.scroll_speed = 900.0;
        state.runner.pos.y += 80.0;
        state.runner.is_airborne = true;
        state.game_over();

        state.reset(42.0);

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.runner.pos, state.runner_home());
        assert!(!state.runner.is_airborne);
        assert_eq!(state.scroll_speed, SCROLL_SPEED);
        assert_eq!(state.spawner.last_spawn_time, 42.0);
        assert_eq!(state.spawner.spawn_rate, INITIAL_SPAWN_RATE);
        assert!(state.scoring.tracked.is_none());
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::ScoreText("Score: 0".to_string()))
        );
    }
}
