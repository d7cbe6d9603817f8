//! Dino Runner entry point
//!
//! Headless native driver: runs the simulation at a fixed timestep with the
//! autopilot tapping for the player and logs the intents a renderer would
//! consume.
//!
//! Usage: `dino-runner [settings.json] [seconds]`

use std::path::PathBuf;
use std::process::ExitCode;

use dino_runner::Settings;
use dino_runner::consts::*;
use dino_runner::sim::{GameEvent, GamePhase, GameState, Sound, TickInput, tick};

/// Frame rate of the pretend display
const FRAME_DT: f32 = 1.0 / 60.0;

/// Game instance holding all state
struct Game {
    state: GameState,
    accumulator: f32,
    /// Absolute clock handed to the simulation
    clock: f64,
    input: TickInput,
}

impl Game {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            clock: 0.0,
            input: TickInput {
                autopilot: true,
                ..Default::default()
            },
        }
    }

    /// Run simulation ticks for one rendered frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.clock += f64::from(SIM_DT);
            tick(&mut self.state, &self.input, SIM_DT, self.clock);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.jump_or_reset = false;
        }

        for event in self.state.drain_events() {
            present(&event);
        }
    }
}

/// Stand-in for the render/audio collaborator
fn present(event: &GameEvent) {
    match event {
        GameEvent::ScoreText(text) => log::info!("{text}"),
        GameEvent::PlaySound(Sound::Death) => log::info!("*death sound*"),
        GameEvent::PlaySound(Sound::Jump) => log::trace!("*jump sound*"),
        GameEvent::RunnerSprite(sprite) => log::debug!("runner sprite -> {sprite:?}"),
        GameEvent::ResetPrompt { visible } => log::debug!("reset prompt visible={visible}"),
        GameEvent::ObstacleSpawned { .. }
        | GameEvent::ObstacleDespawned { .. }
        | GameEvent::GroundScrolled { .. } => {}
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Dino Runner (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next().map(PathBuf::from) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            log::info!("Using default settings");
            Settings::default()
        }
    };
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);

    let state = match settings.new_game() {
        Ok(state) => state,
        Err(e) => {
            log::error!("Fatal configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Game initialized with seed: {}", settings.seed);

    let mut game = Game::new(state);
    let frames = (seconds / FRAME_DT).ceil() as u32;
    for _ in 0..frames {
        game.update(FRAME_DT);
        if game.state.phase == GamePhase::Over {
            break;
        }
    }

    let s = &game.state;
    log::info!(
        "Run finished: score={} jumps={} obstacles={} time={:.1}s phase={:?}",
        s.score,
        s.jumps,
        s.obstacles_spawned,
        s.time,
        s.phase
    );
    ExitCode::SUCCESS
}
