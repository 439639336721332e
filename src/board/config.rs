//! Board parameters and their validation
//!
//! A `BoardConfig` is plain data so it can be loaded from JSON with partial
//! overrides. Nothing downstream trusts it until `validate` has passed;
//! `layout::generate` calls it before computing a single peg.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Peg arrangement strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PegLayout {
    /// Row `r` has `r + 1` pegs, centered over the bottom row
    #[default]
    Triangular,
    /// `peg_cols` pegs on every row
    Grid,
}

/// Parameters a board is derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub peg_layout: PegLayout,
    pub peg_rows: u32,
    /// Only used by `PegLayout::Grid`
    pub peg_cols: u32,

    pub peg_top_offset: f32,
    pub peg_vertical_spacing: f32,
    pub peg_side_margin: f32,
    pub peg_radius: f32,

    pub board_width: f32,
    pub board_height: f32,

    /// Vertical gap between the bottom peg row and the partition tops
    pub bin_gap: f32,
    /// How far the bins extend past the outermost bottom pegs
    pub bin_offset: f32,
    pub bin_partition_thickness: f32,
    pub bin_partition_height: f32,
    /// Partitions block balls when set; otherwise they are only drawn
    pub solid_partitions: bool,

    pub floor_thickness: f32,
    pub wall_thickness: f32,
    /// Must exceed the largest distance a ball can travel in one physics step
    pub sensor_height: f32,
    pub ball_radius: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            peg_layout: PegLayout::Triangular,
            peg_rows: PEG_ROWS,
            peg_cols: PEG_COLS,
            peg_top_offset: PEG_TOP_OFFSET,
            peg_vertical_spacing: PEG_VERTICAL_SPACING,
            peg_side_margin: PEG_SIDE_MARGIN,
            peg_radius: PEG_RADIUS,
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            bin_gap: BIN_GAP,
            bin_offset: BIN_OFFSET,
            bin_partition_thickness: BIN_PARTITION_THICKNESS,
            bin_partition_height: BIN_PARTITION_HEIGHT,
            solid_partitions: false,
            floor_thickness: FLOOR_THICKNESS,
            wall_thickness: WALL_THICKNESS,
            sensor_height: SENSOR_HEIGHT,
            ball_radius: BALL_RADIUS,
        }
    }
}

impl BoardConfig {
    /// Number of bins (and sensors) this board produces
    pub fn bin_count(&self) -> usize {
        match self.peg_layout {
            PegLayout::Triangular => self.peg_rows as usize + 1,
            PegLayout::Grid => self.peg_cols as usize,
        }
    }

    /// Pegs in the widest row; this row anchors the horizontal layout
    pub fn pegs_in_bottom_row(&self) -> u32 {
        match self.peg_layout {
            PegLayout::Triangular => self.peg_rows,
            PegLayout::Grid => self.peg_cols,
        }
    }

    /// x of the leftmost bottom-row peg
    #[inline]
    pub fn leftmost_peg_x(&self) -> f32 {
        self.peg_side_margin
    }

    /// x of the rightmost bottom-row peg
    #[inline]
    pub fn rightmost_peg_x(&self) -> f32 {
        self.board_width - self.peg_side_margin
    }

    /// Horizontal distance between neighbouring pegs in the bottom row
    pub fn bottom_peg_spacing(&self) -> f32 {
        let gaps = self.pegs_in_bottom_row().saturating_sub(1).max(1);
        (self.rightmost_peg_x() - self.leftmost_peg_x()) / gaps as f32
    }

    /// Width of one bin slot
    pub fn partition_spacing(&self) -> f32 {
        let span = self.rightmost_peg_x() - self.leftmost_peg_x() + 2.0 * self.bin_offset;
        span / self.bin_count().max(1) as f32
    }

    /// y of the bottom peg row
    pub fn bottom_row_y(&self) -> f32 {
        self.peg_top_offset + (self.peg_rows.saturating_sub(1)) as f32 * self.peg_vertical_spacing
    }

    /// Top edge of the floor
    #[inline]
    pub fn floor_top(&self) -> f32 {
        self.board_height - self.floor_thickness
    }

    /// Inner faces of the left and right walls (walls are centered on the board edges)
    pub fn interior(&self) -> (f32, f32) {
        let half = self.wall_thickness / 2.0;
        (half, self.board_width - half)
    }

    /// Largest ball speed the sensors can still catch at a given timestep
    pub fn max_safe_ball_speed(&self, dt: f32) -> f32 {
        self.sensor_height / dt
    }

    /// Check every invariant the layout relies on
    pub fn validate(&self) -> Result<()> {
        let reals = [
            ("peg_top_offset", self.peg_top_offset),
            ("peg_vertical_spacing", self.peg_vertical_spacing),
            ("peg_side_margin", self.peg_side_margin),
            ("peg_radius", self.peg_radius),
            ("board_width", self.board_width),
            ("board_height", self.board_height),
            ("sensor_height", self.sensor_height),
            ("ball_radius", self.ball_radius),
        ];
        for (name, value) in reals {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{name} must be a positive number, got {value}")));
            }
        }

        let non_negative = [
            ("bin_gap", self.bin_gap),
            ("bin_offset", self.bin_offset),
            ("bin_partition_thickness", self.bin_partition_thickness),
            ("bin_partition_height", self.bin_partition_height),
            ("floor_thickness", self.floor_thickness),
            ("wall_thickness", self.wall_thickness),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{name} must be non-negative, got {value}")));
            }
        }

        if self.peg_rows < 2 {
            return Err(invalid(format!("peg_rows must be at least 2, got {}", self.peg_rows)));
        }
        if self.peg_layout == PegLayout::Grid && self.peg_cols < 2 {
            return Err(invalid(format!("peg_cols must be at least 2, got {}", self.peg_cols)));
        }
        if self.board_width <= 2.0 * self.peg_side_margin {
            return Err(invalid(format!(
                "board_width ({}) must exceed twice peg_side_margin ({})",
                self.board_width, self.peg_side_margin
            )));
        }

        let min_gap = 2.0 * self.peg_radius;
        if self.bottom_peg_spacing() < min_gap {
            return Err(invalid(format!(
                "peg spacing {:.2} is smaller than a peg diameter {:.2}",
                self.bottom_peg_spacing(),
                min_gap
            )));
        }
        if self.peg_vertical_spacing < min_gap {
            return Err(invalid(format!(
                "peg_vertical_spacing {:.2} is smaller than a peg diameter {:.2}",
                self.peg_vertical_spacing, min_gap
            )));
        }

        let (inner_left, _) = self.interior();
        if self.peg_side_margin - self.peg_radius < inner_left {
            return Err(invalid(format!(
                "outer pegs overlap the walls (margin {}, peg radius {}, wall face at {})",
                self.peg_side_margin, self.peg_radius, inner_left
            )));
        }
        if self.peg_side_margin - self.bin_offset < inner_left {
            return Err(invalid(format!(
                "bins extend past the walls (margin {}, bin offset {}, wall face at {})",
                self.peg_side_margin, self.bin_offset, inner_left
            )));
        }

        let sensor_top = self.floor_top() - self.sensor_height;
        if self.bottom_row_y() + self.peg_radius >= sensor_top {
            return Err(invalid(format!(
                "peg field (bottom row at {}) reaches the bin sensors (top at {})",
                self.bottom_row_y(),
                sensor_top
            )));
        }
        let partition_bottom = self.bottom_row_y() + self.bin_gap + self.bin_partition_height;
        if partition_bottom > self.floor_top() {
            return Err(invalid(format!(
                "bin partitions (bottom at {}) extend into the floor (top at {})",
                partition_bottom,
                self.floor_top()
            )));
        }

        let diameter = 2.0 * self.ball_radius;
        let (inner_left, inner_right) = self.interior();
        if diameter >= inner_right - inner_left {
            return Err(invalid(format!(
                "ball diameter {:.2} does not fit between the walls ({:.2} wide)",
                diameter,
                inner_right - inner_left
            )));
        }
        let peg_gap = self.bottom_peg_spacing() - 2.0 * self.peg_radius;
        if diameter >= peg_gap {
            return Err(invalid(format!(
                "ball diameter {:.2} does not fit through the {:.2} gap between pegs",
                diameter, peg_gap
            )));
        }

        if self.solid_partitions {
            let opening = self.partition_spacing() - self.bin_partition_thickness;
            if 2.0 * self.ball_radius >= opening {
                return Err(invalid(format!(
                    "solid partitions leave a {:.2} opening, too narrow for a ball of diameter {:.2}",
                    opening,
                    2.0 * self.ball_radius
                )));
            }
        }

        Ok(())
    }
}

fn invalid(msg: String) -> Error {
    Error::InvalidConfig(msg)
}
