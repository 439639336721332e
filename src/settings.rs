//! Run settings
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::BoardConfig;
use crate::consts::*;
use crate::error::Result;
use crate::physics::PhysicsTuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: BoardConfig,
    pub physics: PhysicsTuning,

    /// Balls dropped per spawn request
    pub balls_per_click: u32,
    /// Seed for spawn jitter
    pub seed: u64,
    /// Maximum horizontal offset applied to each spawned ball
    pub spawn_jitter: f32,
    /// Where balls are dropped; defaults to the top center of the board
    pub drop_point: Option<(f32, f32)>,
    /// Simulated seconds the headless runner plays before reporting
    pub run_seconds: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            physics: PhysicsTuning::default(),
            balls_per_click: BALLS_PER_CLICK,
            seed: DEFAULT_SEED,
            spawn_jitter: SPAWN_JITTER,
            drop_point: None,
            run_seconds: RUN_SECONDS,
        }
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Drop point, falling back to the original dropper position:
    /// half a peg spacing left of center, near the top
    pub fn effective_drop_point(&self) -> (f32, f32) {
        self.drop_point.unwrap_or_else(|| {
            let x = self.board.board_width / 2.0 - self.board.bottom_peg_spacing() / 2.0;
            (x, DROP_HEIGHT)
        })
    }
}
