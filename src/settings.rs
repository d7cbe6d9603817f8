//! Run settings
//!
//! Loaded from a JSON file by the native driver. Every field has a default,
//! so a file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{ConfigurationError, GameState, Layout, RunConfig};

/// Ground texture height; the ground surface sits this far above the padding
const GROUND_TILE_HEIGHT: f32 = GROUND_HEIGHT - GROUND_PADDING;
/// Space kept clear at the bottom of the screen
const GROUND_PADDING: f32 = 50.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigurationError),
}

/// Everything needed to start a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for the run
    pub seed: u64,
    pub screen_width: f32,
    pub screen_height: f32,
    pub ground_tile_height: f32,
    pub ground_padding: f32,
    pub run: RunConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            ground_tile_height: GROUND_TILE_HEIGHT,
            ground_padding: GROUND_PADDING,
            run: RunConfig::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a settings file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.layout()?;
        self.run.validate()
    }

    /// Build the scene layout and compute its ground height
    pub fn layout(&self) -> Result<Layout, ConfigurationError> {
        let mut layout = Layout::new(self.screen_width, self.screen_height)?;
        layout.compute_ground_height(self.ground_tile_height, self.ground_padding)?;
        Ok(layout)
    }

    /// Start a new run from these settings
    pub fn new_game(&self) -> Result<GameState, ConfigurationError> {
        GameState::new(self.seed, self.layout()?, self.run.clone())
    }
}
