//! Scene layout: screen bounds and the ground reference
//!
//! The ground height is computed once when the scene is built. Every other
//! vertical position (runner floor, obstacle base) is derived from it, so
//! reading it before it exists is the one fatal configuration error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal configuration problems. The simulation cannot run with any of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("ground height was read before it was computed")]
    GroundHeightUnset,
    #[error("invalid layout {width}x{height}: dimensions must be positive")]
    InvalidLayout { width: f32, height: f32 },
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Visible play area. Origin is bottom-left, y grows upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    ground_height: Option<f32>,
}

impl Layout {
    /// Create a layout with no ground computed yet
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigurationError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigurationError::InvalidLayout { width, height });
        }
        Ok(Self {
            width,
            height,
            ground_height: None,
        })
    }

    /// Create a layout with a known ground height
    pub fn with_ground(width: f32, height: f32, ground_height: f32) -> Result<Self, ConfigurationError> {
        let mut layout = Self::new(width, height)?;
        layout.set_ground_height(ground_height)?;
        Ok(layout)
    }

    /// Ground surface = ground tile height + bottom padding
    pub fn compute_ground_height(&mut self, tile_height: f32, padding: f32) -> Result<f32, ConfigurationError> {
        let ground = tile_height + padding;
        self.set_ground_height(ground)?;
        Ok(ground)
    }

    pub fn set_ground_height(&mut self, ground_height: f32) -> Result<(), ConfigurationError> {
        if !(0.0..self.height).contains(&ground_height) {
            return Err(ConfigurationError::InvalidSetting {
                name: "ground_height",
                reason: format!("{ground_height} is outside [0, {})", self.height),
            });
        }
        self.ground_height = Some(ground_height);
        Ok(())
    }

    /// The walking/landing surface
    pub fn ground_height(&self) -> Result<f32, ConfigurationError> {
        self.ground_height.ok_or(ConfigurationError::GroundHeightUnset)
    }

    pub fn has_ground(&self) -> bool {
        self.ground_height.is_some()
    }
}
