//! Procedural board layout
//!
//! `generate` turns a `BoardConfig` into a `GeometryModel`. The bottom peg
//! row is the anchor: it spans `[peg_side_margin, board_width - peg_side_margin]`
//! and the bin sensors are keyed to that same span, so bins always sit under
//! the peg field whatever the row count.

use glam::Vec2;

use super::config::{BoardConfig, PegLayout};
use super::geometry::{BinSensor, GeometryModel, Peg, Rect};
use crate::error::Result;

/// Build the static geometry for a board
///
/// Pure and deterministic. Fails with `InvalidConfig` before computing
/// anything if the config breaks an invariant.
pub fn generate(config: &BoardConfig) -> Result<GeometryModel> {
    config.validate()?;

    let pegs = match config.peg_layout {
        PegLayout::Triangular => triangular_pegs(config),
        PegLayout::Grid => grid_pegs(config),
    };

    let (walls, floor) = enclosure(config);
    let (bin_partitions, bin_sensors) = bins(config);

    log::debug!(
        "Generated {:?} board: {} pegs, {} bins, partition spacing {:.2}",
        config.peg_layout,
        pegs.len(),
        bin_sensors.len(),
        config.partition_spacing()
    );

    Ok(GeometryModel {
        pegs,
        walls,
        floor,
        bin_partitions,
        solid_partitions: config.solid_partitions,
        bin_sensors,
        partition_spacing: config.partition_spacing(),
    })
}

fn row_y(config: &BoardConfig, row: u32) -> f32 {
    config.peg_top_offset + row as f32 * config.peg_vertical_spacing
}

/// Row `r` holds `r + 1` pegs, shifted right by half a spacing per missing peg
fn triangular_pegs(config: &BoardConfig) -> Vec<Peg> {
    let rows = config.peg_rows;
    let spacing = config.bottom_peg_spacing();
    let mut pegs = Vec::with_capacity(peg_capacity(rows as usize, rows as usize + 1) / 2);

    for row in 0..rows {
        let y = row_y(config, row);
        let row_offset = ((rows - 1 - row) as f32 * spacing) / 2.0;
        for col in 0..=row {
            let x = config.leftmost_peg_x() + row_offset + col as f32 * spacing;
            pegs.push(Peg {
                pos: Vec2::new(x, y),
                radius: config.peg_radius,
            });
        }
    }
    pegs
}

fn grid_pegs(config: &BoardConfig) -> Vec<Peg> {
    let spacing = config.bottom_peg_spacing();
    let mut pegs = Vec::with_capacity(peg_capacity(
        config.peg_rows as usize,
        config.peg_cols as usize,
    ));

    for row in 0..config.peg_rows {
        let y = row_y(config, row);
        for col in 0..config.peg_cols {
            let x = config.leftmost_peg_x() + col as f32 * spacing;
            pegs.push(Peg {
                pos: Vec2::new(x, y),
                radius: config.peg_radius,
            });
        }
    }
    pegs
}

fn peg_capacity(rows: usize, per_row: usize) -> usize {
    rows.saturating_mul(per_row)
}

/// Walls centered on the board edges, floor flush with the bottom
fn enclosure(config: &BoardConfig) -> ([Rect; 2], Rect) {
    let h = config.board_height;
    let w = config.board_width;
    let wall_size = Vec2::new(config.wall_thickness, h);

    let left = Rect::from_center_size(Vec2::new(0.0, h / 2.0), wall_size);
    let right = Rect::from_center_size(Vec2::new(w, h / 2.0), wall_size);
    let floor = Rect::new(Vec2::new(0.0, config.floor_top()), Vec2::new(w, h));

    ([left, right], floor)
}

fn bins(config: &BoardConfig) -> (Vec<Rect>, Vec<BinSensor>) {
    let bin_count = config.bin_count();
    let spacing = config.partition_spacing();
    let start = config.leftmost_peg_x() - config.bin_offset;
    let edge = |i: usize| start + i as f32 * spacing;

    let partition_top = config.bottom_row_y() + config.bin_gap;
    let partition_size = Vec2::new(config.bin_partition_thickness, config.bin_partition_height);
    let partitions = (0..=bin_count)
        .map(|i| {
            let center = Vec2::new(edge(i), partition_top + config.bin_partition_height / 2.0);
            Rect::from_center_size(center, partition_size)
        })
        .collect();

    // Sensors rest on the floor, one per slot between consecutive partitions
    let sensor_bottom = config.floor_top();
    let sensor_top = sensor_bottom - config.sensor_height;
    let sensors = (0..bin_count)
        .map(|bin| BinSensor {
            bin,
            rect: Rect::new(
                Vec2::new(edge(bin), sensor_top),
                Vec2::new(edge(bin + 1), sensor_bottom),
            ),
        })
        .collect();

    (partitions, sensors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    fn small_config() -> BoardConfig {
        BoardConfig {
            peg_rows: 2,
            peg_top_offset: 100.0,
            peg_vertical_spacing: 50.0,
            peg_side_margin: 50.0,
            board_width: 200.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_two_row_board() {
        let geometry = generate(&small_config()).unwrap();

        assert_eq!(geometry.pegs.len(), 3);
        // Top row: one peg, centered
        assert!((geometry.pegs[0].pos.x - 100.0).abs() < EPS);
        assert!((geometry.pegs[0].pos.y - 100.0).abs() < EPS);
        // Bottom row: the anchor
        assert!((geometry.pegs[1].pos.x - 50.0).abs() < EPS);
        assert!((geometry.pegs[2].pos.x - 150.0).abs() < EPS);
        assert!((geometry.pegs[2].pos.y - 150.0).abs() < EPS);

        assert_eq!(geometry.bin_count(), 3);
        let (left, right) = geometry.bin_span();
        assert!((left - 30.0).abs() < EPS);
        assert!((right - 170.0).abs() < EPS);
        for sensor in &geometry.bin_sensors {
            assert!((sensor.rect.size().x - 140.0 / 3.0).abs() < EPS);
        }
    }

    #[test]
    fn test_default_board_counts() {
        let geometry = generate(&BoardConfig::default()).unwrap();
        assert_eq!(geometry.pegs.len(), 55);
        assert_eq!(geometry.bin_count(), 11);
        assert_eq!(geometry.bin_partitions.len(), 12);
        assert_eq!(geometry.peg_rows().len(), 10);
        for (r, row) in geometry.peg_rows().iter().enumerate() {
            assert_eq!(row.len(), r + 1);
        }
    }

    #[test]
    fn test_grid_layout() {
        let config = BoardConfig {
            peg_layout: PegLayout::Grid,
            peg_rows: 4,
            peg_cols: 6,
            ..Default::default()
        };
        let geometry = generate(&config).unwrap();
        assert_eq!(geometry.pegs.len(), 24);
        assert_eq!(geometry.bin_count(), 6);

        let rows = geometry.peg_rows();
        assert_eq!(rows.len(), 4);
        for row in rows {
            assert_eq!(row.len(), 6);
            assert!((row[0].pos.x - config.peg_side_margin).abs() < EPS);
            assert!((row[5].pos.x - (config.board_width - config.peg_side_margin)).abs() < EPS);
        }
    }

    #[test]
    fn test_walls_and_floor() {
        let config = BoardConfig::default();
        let geometry = generate(&config).unwrap();
        let [left, right] = geometry.walls;

        // Centered on the board edges
        assert!((left.center().x - 0.0).abs() < EPS);
        assert!((right.center().x - config.board_width).abs() < EPS);
        let interior = right.min.x - left.max.x;
        assert!((interior - (config.board_width - config.wall_thickness)).abs() < EPS);

        assert!((geometry.floor.max.y - config.board_height).abs() < EPS);
        assert!((geometry.floor.size().y - config.floor_thickness).abs() < EPS);
        assert!((geometry.floor.size().x - config.board_width).abs() < EPS);

        for peg in &geometry.pegs {
            assert!(peg.pos.x - peg.radius >= left.max.x);
            assert!(peg.pos.x + peg.radius <= right.min.x);
        }
    }

    #[test]
    fn test_sensors_sit_on_floor() {
        let config = BoardConfig::default();
        let geometry = generate(&config).unwrap();
        for sensor in &geometry.bin_sensors {
            assert_eq!(sensor.rect.max.y, geometry.floor.min.y);
            assert!((sensor.rect.size().y - config.sensor_height).abs() < EPS);
        }
        assert!((geometry.sensor_height() - config.sensor_height).abs() < EPS);
    }

    #[test]
    fn test_partitions_line_up_with_sensors() {
        let geometry = generate(&BoardConfig::default()).unwrap();
        for sensor in &geometry.bin_sensors {
            let left = geometry.bin_partitions[sensor.bin].center().x;
            let right = geometry.bin_partitions[sensor.bin + 1].center().x;
            assert!((sensor.rect.min.x - left).abs() < EPS);
            assert!((sensor.rect.max.x - right).abs() < EPS);
        }
    }

    #[test]
    fn test_peg_capacity_is_computed_without_overflow() {
        // 70000 * 70000 wraps a u32
        assert_eq!(peg_capacity(70_000, 70_000), 4_900_000_000);
        assert_eq!(peg_capacity(usize::MAX, 2), usize::MAX);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = BoardConfig {
            peg_rows: 1,
            ..Default::default()
        };
        assert!(matches!(generate(&config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let config = BoardConfig::default();
        assert_eq!(generate(&config).unwrap(), generate(&config).unwrap());
    }

    fn triangular_config() -> impl Strategy<Value = BoardConfig> {
        (2u32..16, 40.0f32..80.0, 0.0f32..20.0, 30.0f32..60.0).prop_map(
            |(rows, margin, bin_offset, v_spacing)| BoardConfig {
                peg_rows: rows,
                peg_side_margin: margin,
                bin_offset,
                peg_vertical_spacing: v_spacing,
                peg_top_offset: 100.0,
                board_width: 900.0,
                board_height: 1400.0,
                ..Default::default()
            },
        )
    }

    fn grid_config() -> impl Strategy<Value = BoardConfig> {
        (2u32..12, 2u32..14, 40.0f32..80.0, 0.0f32..20.0).prop_map(
            |(rows, cols, margin, bin_offset)| BoardConfig {
                peg_layout: PegLayout::Grid,
                peg_rows: rows,
                peg_cols: cols,
                peg_side_margin: margin,
                bin_offset,
                peg_top_offset: 100.0,
                board_width: 900.0,
                board_height: 1400.0,
                ..Default::default()
            },
        )
    }

    fn any_config() -> impl Strategy<Value = BoardConfig> {
        prop_oneof![triangular_config(), grid_config()]
    }

    proptest! {
        #[test]
        fn prop_bin_count_is_rows_plus_one(config in triangular_config()) {
            let geometry = generate(&config).unwrap();
            prop_assert_eq!(config.bin_count(), config.peg_rows as usize + 1);
            prop_assert_eq!(geometry.bin_sensors.len(), config.bin_count());
            prop_assert_eq!(geometry.bin_partitions.len(), config.bin_count() + 1);
        }

        #[test]
        fn prop_grid_bins_follow_columns(config in grid_config()) {
            let geometry = generate(&config).unwrap();
            prop_assert_eq!(config.bin_count(), config.peg_cols as usize);
            prop_assert_eq!(geometry.bin_sensors.len(), config.peg_cols as usize);
            prop_assert_eq!(geometry.bin_partitions.len(), config.peg_cols as usize + 1);
            prop_assert_eq!(geometry.pegs.len(), (config.peg_rows * config.peg_cols) as usize);
        }

        #[test]
        fn prop_sensors_are_contiguous(config in any_config()) {
            let geometry = generate(&config).unwrap();
            let sensors = &geometry.bin_sensors;

            for (i, sensor) in sensors.iter().enumerate() {
                prop_assert_eq!(sensor.bin, i);
                prop_assert!(sensor.rect.max.x > sensor.rect.min.x);
            }
            for pair in sensors.windows(2) {
                prop_assert_eq!(pair[0].rect.max.x, pair[1].rect.min.x);
            }

            let (left, right) = geometry.bin_span();
            prop_assert!((left - (config.leftmost_peg_x() - config.bin_offset)).abs() < EPS);
            prop_assert!((right - (config.rightmost_peg_x() + config.bin_offset)).abs() < EPS);
        }

        #[test]
        fn prop_rows_symmetric_about_center(config in triangular_config()) {
            let geometry = generate(&config).unwrap();
            let center = config.board_width / 2.0;
            for row in geometry.peg_rows() {
                let n = row.len();
                for i in 0..n {
                    let mirrored = 2.0 * center - row[n - 1 - i].pos.x;
                    prop_assert!((row[i].pos.x - mirrored).abs() < EPS);
                }
            }
        }

        #[test]
        fn prop_pegs_never_overlap(config in any_config()) {
            let geometry = generate(&config).unwrap();
            for (i, a) in geometry.pegs.iter().enumerate() {
                for b in &geometry.pegs[i + 1..] {
                    prop_assert!(a.pos.distance(b.pos) >= a.radius + b.radius - EPS);
                }
            }
        }
    }
}
