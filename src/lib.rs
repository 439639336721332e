//! Galton Board - balls fall through a triangle of pegs into bins
//!
//! Core modules:
//! - `board`: Procedural layout (pegs, walls, floor, bins) from a `BoardConfig`
//! - `physics`: Engine boundary trait plus a small in-process engine
//! - `sim`: Bin tally and the simulation lifecycle controller
//! - `settings`: JSON-loadable run settings

pub mod board;
pub mod error;
pub mod physics;
pub mod settings;
pub mod sim;

pub use board::{BoardConfig, GeometryModel, PegLayout, generate};
pub use error::{Error, Result};
pub use physics::{BallId, KinematicWorld, PhysicsAdapter, PhysicsTuning};
pub use settings::Settings;
pub use sim::{BinTally, Histogram, SimPhase, SimulationController};

/// Simulation and board constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame fed to the accumulator (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Board defaults
    pub const BOARD_WIDTH: f32 = 700.0;
    pub const BOARD_HEIGHT: f32 = 970.0;
    pub const WALL_THICKNESS: f32 = 40.0;
    pub const FLOOR_THICKNESS: f32 = 20.0;

    /// Peg defaults
    pub const PEG_ROWS: u32 = 10;
    pub const PEG_COLS: u32 = 11;
    pub const PEG_TOP_OFFSET: f32 = 150.0;
    pub const PEG_VERTICAL_SPACING: f32 = 50.0;
    pub const PEG_SIDE_MARGIN: f32 = 50.0;
    pub const PEG_RADIUS: f32 = 5.0;

    /// Bin defaults
    pub const BIN_GAP: f32 = 100.0;
    pub const BIN_OFFSET: f32 = 20.0;
    pub const BIN_PARTITION_THICKNESS: f32 = 5.0;
    pub const BIN_PARTITION_HEIGHT: f32 = 100.0;
    pub const SENSOR_HEIGHT: f32 = 10.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 7.0;
    pub const BALL_RESTITUTION: f32 = 0.5;
    pub const BALL_FRICTION: f32 = 0.05;
    /// Terminal speed (px/s); 7.5 px per step at 120 Hz, under the sensor height
    pub const MAX_BALL_SPEED: f32 = 900.0;
    /// Downward acceleration (px/s²)
    pub const GRAVITY: f32 = 980.0;

    /// Spawning
    pub const BALLS_PER_CLICK: u32 = 100;
    pub const SPAWN_JITTER: f32 = 2.0;
    pub const DROP_HEIGHT: f32 = 30.0;
    pub const DEFAULT_SEED: u64 = 0x6a17_0b0a;
    pub const RUN_SECONDS: f32 = 20.0;
}
