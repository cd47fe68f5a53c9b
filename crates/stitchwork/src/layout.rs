//! Topology layout: where every row and stitch goes.
//!
//! `layout` is a pure function of the pattern and the spacing constants.
//! Both renderers (3D solids and the 2D chart) consume its output, so the
//! two views always agree on ordering, angles and radii.
//!
//! Coordinates are in scene units with Y up:
//!
//! - FLAT: row `r` sits at height `r × row_step` and depth `r × depth_step`
//!   (later rows are in front). Stitches are centered on x = 0.
//! - ROUND: row `r` sits at height `r × round_step`. Its radius grows with
//!   its stitch count so every stitch gets about the same arc length.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::geometry::DVec3;
use crate::model::{ConstructionMode, Pattern};

/// Spacing constants for the layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// FLAT: horizontal distance between neighboring stitches
    pub cell_spacing: f64,
    /// FLAT: vertical distance between rows
    pub row_step: f64,
    /// FLAT: depth added per row
    pub depth_step: f64,
    /// ROUND: target arc length per stitch
    pub stitch_arc: f64,
    /// ROUND: smallest radius a round can have
    pub min_radius: f64,
    /// ROUND: vertical distance between rounds
    pub round_step: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_spacing: 0.8,
            row_step: 0.8,
            depth_step: 0.4,
            stitch_arc: 0.8,
            min_radius: 0.4,
            round_step: 0.4,
        }
    }
}

/// Placement of a single stitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StitchPlacement {
    pub stitch_index: usize,
    /// Base of the stitch in scene space.
    pub position: DVec3,
    /// ROUND: angle around the center, `(i / n) × 2π`. FLAT: `None`.
    pub angle: Option<f64>,
}

/// Placement of one row and its stitches.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPlacement {
    pub row_index: usize,
    /// Height of the row base (Y).
    pub vertical_level: f64,
    /// FLAT: Z of the row. ROUND: 0.
    pub depth: f64,
    /// ROUND: radius of the round. FLAT: `None`.
    pub radius: Option<f64>,
    /// Empty for rows without stitches; the row still keeps its slot.
    pub stitches: Vec<StitchPlacement>,
}

impl RowPlacement {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stitches.is_empty()
    }
}

/// Compute placements for every row (empty rows included).
///
/// Total over any pattern: an empty pattern gives an empty vector.
pub fn layout(pattern: &Pattern, config: &LayoutConfig) -> Vec<RowPlacement> {
    pattern
        .rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| match pattern.mode {
            ConstructionMode::Flat => flat_row(row_index, row.len(), config),
            ConstructionMode::Round => round_row(row_index, row.len(), config),
        })
        .collect()
}

/// Horizontal offset of stitch `i` in a centered row of `n`, in cells.
#[inline]
pub fn flat_column(i: usize, n: usize) -> f64 {
    i as f64 - n as f64 / 2.0 + 0.5
}

/// Radius of a round with `n` stitches.
///
/// Circumference `n × stitch_arc`, never below `min_radius`.
#[inline]
pub fn round_radius(n: usize, config: &LayoutConfig) -> f64 {
    (n as f64 * config.stitch_arc / TAU).max(config.min_radius)
}

/// Angle of stitch `i` in a round of `n`. Zero when `n == 0`.
#[inline]
pub fn round_angle(i: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    i as f64 / n as f64 * TAU
}

fn flat_row(row_index: usize, n: usize, config: &LayoutConfig) -> RowPlacement {
    let vertical_level = row_index as f64 * config.row_step;
    let depth = row_index as f64 * config.depth_step;

    let stitches = (0..n)
        .map(|i| {
            StitchPlacement {
                stitch_index: i,
                position: DVec3::new(flat_column(i, n) * config.cell_spacing, vertical_level, depth),
                angle: None,
            }
        })
        .collect();

    RowPlacement { row_index, vertical_level, depth, radius: None, stitches }
}

fn round_row(row_index: usize, n: usize, config: &LayoutConfig) -> RowPlacement {
    let vertical_level = row_index as f64 * config.round_step;
    let radius = round_radius(n, config);

    let stitches = (0..n)
        .map(|i| {
            let angle = round_angle(i, n);
            StitchPlacement {
                stitch_index: i,
                position: DVec3::new(angle.cos() * radius, vertical_level, angle.sin() * radius),
                angle: Some(angle),
            }
        })
        .collect();

    RowPlacement { row_index, vertical_level, depth: 0.0, radius: Some(radius), stitches }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stitch::StitchType;

    fn flat(counts: &[usize]) -> Pattern {
        build(ConstructionMode::Flat, counts)
    }

    fn round(counts: &[usize]) -> Pattern {
        build(ConstructionMode::Round, counts)
    }

    fn build(mode: ConstructionMode, counts: &[usize]) -> Pattern {
        let mut p = Pattern::new("test", mode);
        for &n in counts {
            p = p.with_row();
            for _ in 0..n {
                p = p.with_stitch(StitchType::Sc);
            }
        }
        p
    }

    #[test]
    fn empty_pattern_has_no_rows() {
        let cfg = LayoutConfig::default();
        assert!(layout(&flat(&[]), &cfg).is_empty());
        assert!(layout(&round(&[]), &cfg).is_empty());
    }

    #[test]
    fn flat_three_singles_are_centered() {
        let cfg = LayoutConfig::default();
        let rows = layout(&flat(&[3]), &cfg);
        assert_eq!(rows.len(), 1);
        let xs: Vec<f64> = rows[0].stitches.iter().map(|s| s.position.x).collect();
        let c = cfg.cell_spacing;
        for (x, expected) in xs.iter().zip([-c, 0.0, c]) {
            assert!((x - expected).abs() < 1e-12, "{} != {}", x, expected);
        }
        assert!(rows[0].stitches.iter().all(|s| s.position.y == 0.0));
        assert_eq!(rows[0].vertical_level, 0.0);
    }

    #[test]
    fn flat_rows_step_up_and_forward() {
        let cfg = LayoutConfig::default();
        let rows = layout(&flat(&[2, 2, 2]), &cfg);
        for (r, row) in rows.iter().enumerate() {
            assert!((row.vertical_level - r as f64 * cfg.row_step).abs() < 1e-12);
            assert!((row.depth - r as f64 * cfg.depth_step).abs() < 1e-12);
            assert!(row.radius.is_none());
        }
    }

    #[test]
    fn empty_row_keeps_its_slot() {
        let cfg = LayoutConfig::default();
        let rows = layout(&flat(&[2, 0, 2]), &cfg);
        assert_eq!(rows.len(), 3);
        assert!(rows[1].is_empty());
        assert_eq!(rows[1].row_index, 1);
        assert!((rows[2].vertical_level - 2.0 * cfg.row_step).abs() < 1e-12);
    }

    #[test]
    fn round_radius_grows_with_count() {
        let cfg = LayoutConfig::default();
        let rows = layout(&round(&[6, 12]), &cfg);
        let r0 = rows[0].radius.unwrap();
        let r1 = rows[1].radius.unwrap();
        assert!(r1 > r0, "12-stitch round ({}) should be wider than 6 ({})", r1, r0);
    }

    #[test]
    fn round_angles_evenly_spaced() {
        let cfg = LayoutConfig::default();
        let rows = layout(&round(&[6, 12]), &cfg);
        for row in &rows {
            let n = row.stitches.len();
            for (i, s) in row.stitches.iter().enumerate() {
                let expected = i as f64 / n as f64 * TAU;
                assert!((s.angle.unwrap() - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn round_positions_lie_on_radius() {
        let cfg = LayoutConfig::default();
        let rows = layout(&round(&[8]), &cfg);
        let radius = rows[0].radius.unwrap();
        for s in &rows[0].stitches {
            let r = (s.position.x.powi(2) + s.position.z.powi(2)).sqrt();
            assert!((r - radius).abs() < 1e-9);
        }
    }

    #[test]
    fn small_rounds_use_min_radius() {
        let cfg = LayoutConfig::default();
        assert_eq!(round_radius(0, &cfg), cfg.min_radius);
        assert_eq!(round_radius(1, &cfg), cfg.min_radius);
        assert_eq!(round_angle(3, 0), 0.0);
    }

    #[test]
    fn round_level_ignores_radius() {
        let cfg = LayoutConfig::default();
        let rows = layout(&round(&[3, 30, 0, 6]), &cfg);
        for (r, row) in rows.iter().enumerate() {
            assert!((row.vertical_level - r as f64 * cfg.round_step).abs() < 1e-12);
        }
    }
}
