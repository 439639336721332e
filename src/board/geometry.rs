//! Static board geometry
//!
//! Pure data produced by `layout::generate`. Positions are in board space:
//! origin at the top-left corner, y grows downward (the direction of gravity).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A circular peg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub pos: Vec2,
    pub radius: f32,
}

/// Axis-aligned rectangle stored by its corners
///
/// Storing edges rather than center/size keeps neighbouring bin sensors
/// exactly contiguous: sensor `i`'s right edge is bit-identical to sensor
/// `i + 1`'s left edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size() / 2.0
    }
}

/// Non-blocking region marking one bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinSensor {
    /// Bin index, 0 is leftmost
    pub bin: usize,
    pub rect: Rect,
}

/// Everything static on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryModel {
    /// Row-major, top row first, left to right within a row
    pub pegs: Vec<Peg>,
    /// Left wall, then right wall
    pub walls: [Rect; 2],
    pub floor: Rect,
    /// `bin_count + 1` dividers, left to right
    pub bin_partitions: Vec<Rect>,
    /// Whether partitions should be materialized as blocking bodies
    pub solid_partitions: bool,
    /// `bin_count` sensors, index-aligned with the tally
    pub bin_sensors: Vec<BinSensor>,
    /// Distance between neighbouring partitions
    pub partition_spacing: f32,
}

impl GeometryModel {
    pub fn bin_count(&self) -> usize {
        self.bin_sensors.len()
    }

    /// Horizontal extent covered by the bin sensors
    pub fn bin_span(&self) -> (f32, f32) {
        match (self.bin_sensors.first(), self.bin_sensors.last()) {
            (Some(first), Some(last)) => (first.rect.min.x, last.rect.max.x),
            _ => (0.0, 0.0),
        }
    }

    /// Height of the sensor band (all sensors share it)
    pub fn sensor_height(&self) -> f32 {
        self.bin_sensors
            .first()
            .map(|s| s.rect.size().y)
            .unwrap_or(0.0)
    }

    /// Pegs grouped by row (pegs in a row share a y coordinate)
    pub fn peg_rows(&self) -> Vec<&[Peg]> {
        self.pegs
            .chunk_by(|a, b| a.pos.y == b.pos.y)
            .collect()
    }
}
