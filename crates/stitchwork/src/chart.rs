//! Chart renderer: the 2D schematic view.
//!
//! Works in two passes:
//!
//! 1. [`chart_layout`] turns layout placements into chart-space geometry
//!    (canvas size, cell centers, glyph rotation, ring radii, labels).
//!    The viewport hit-tests against this.
//! 2. [`ChartScene::from_layout`] turns that geometry into a small scene
//!    graph of rects, circles and text, which [`ChartScene::to_svg`]
//!    serializes.
//!
//! Chart space is in pixels with y pointing down. FLAT rows are drawn
//! bottom-up (row 1 at the bottom), ROUND rounds as concentric rings
//! starting at 12 o'clock.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::Point;
use crate::layout::{round_angle, RowPlacement};
use crate::model::{ConstructionMode, Pattern};

const GLYPH_COLOR: Color = Color::rgb(0x37, 0x41, 0x51);
const LABEL_COLOR: Color = Color::rgb(0x81, 0x8c, 0xf8);
const GUIDE_COLOR: Color = Color::rgb(0xe5, 0xe7, 0xeb);
const MARKER_COLOR: Color = Color::rgb(0x63, 0x66, 0xf1);

/// FLAT: blank space between neighboring cell squares (px).
const CELL_GAP: f64 = 2.0;

/// Sizing constants for the chart (pixels).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// FLAT: side of one stitch cell
    pub cell_size: f64,
    /// Margin around the content
    pub padding: f64,
    /// Smallest canvas side, so empty charts are still usable
    pub min_size: f64,
    /// ROUND: ring radius added on top of the scaled layout radius
    pub ring_base: f64,
    /// ROUND: pixels per layout unit of round radius
    pub px_per_unit: f64,
    /// ROUND: smallest distance between neighboring rings
    pub min_ring_gap: f64,
    /// ROUND: room kept right of the outermost ring for its label
    pub label_margin: f64,
    /// ROUND: radius of the stitch background circle
    pub stitch_radius: f64,
    /// Opacity of the stitch backgrounds
    pub fill_opacity: f64,
    pub flat_glyph_size: f64,
    pub round_glyph_size: f64,
    pub label_size: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            cell_size: 30.0,
            padding: 20.0,
            min_size: 200.0,
            ring_base: 20.0,
            px_per_unit: 100.0,
            min_ring_gap: 40.0,
            label_margin: 30.0,
            stitch_radius: 12.0,
            fill_opacity: 0.4,
            flat_glyph_size: 14.0,
            round_glyph_size: 12.0,
            label_size: 10.0,
        }
    }
}

// ============================================================================
// Chart geometry
// ============================================================================

/// One stitch on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartCell {
    pub stitch_index: usize,
    pub center: Point,
    /// Glyph rotation in degrees (0 for FLAT).
    pub rotation_deg: f64,
    pub glyph: char,
    pub fill: Color,
}

/// One row (or round) on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub row_index: usize,
    /// `R{n}`, 1-based.
    pub label: String,
    /// Baseline start of the label text.
    pub label_anchor: Point,
    /// ROUND: ring radius in pixels.
    pub ring: Option<f64>,
    pub cells: Vec<ChartCell>,
}

/// Chart-space geometry of a whole pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    /// Pattern name, used as the document title.
    pub title: String,
    pub mode: ConstructionMode,
    pub width: f64,
    pub height: f64,
    pub rows: Vec<ChartRow>,
    /// Distance from a cell center that still counts as a hit.
    pub hit_radius: f64,
}

impl ChartLayout {
    /// Center of the canvas; the viewport zooms around it.
    pub fn content_center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn cell(&self, row_index: usize, stitch_index: usize) -> Option<&ChartCell> {
        self.rows
            .get(row_index)?
            .cells
            .iter()
            .find(|c| c.stitch_index == stitch_index)
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }

    /// Find the stitch under a chart-space point as (row, stitch).
    ///
    /// FLAT cells are squares, ROUND cells are circles. When shapes overlap
    /// the closest center wins.
    pub fn hit_test(&self, point: Point) -> Option<(usize, usize)> {
        if !point.is_finite() {
            return None;
        }

        let metric = |c: &ChartCell| -> f64 {
            let d = point - c.center;
            match self.mode {
                ConstructionMode::Flat => d.x.abs().max(d.y.abs()),
                ConstructionMode::Round => d.length(),
            }
        };

        self.rows
            .iter()
            .flat_map(|row| row.cells.iter().map(move |c| (row.row_index, c)))
            .map(|(row_index, cell)| (row_index, cell.stitch_index, metric(cell)))
            .filter(|(_, _, d)| *d <= self.hit_radius)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(row, stitch, _)| (row, stitch))
    }
}

/// Compute chart geometry from placements.
///
/// Every placement row gets a [`ChartRow`] (empty rows keep their label);
/// placements whose stitch no longer exists in `pattern` are dropped.
pub fn chart_layout(pattern: &Pattern, placements: &[RowPlacement], config: &ChartConfig) -> ChartLayout {
    match pattern.mode {
        ConstructionMode::Flat => flat_layout(pattern, placements, config),
        ConstructionMode::Round => round_layout(pattern, placements, config),
    }
}

fn flat_layout(pattern: &Pattern, placements: &[RowPlacement], config: &ChartConfig) -> ChartLayout {
    let cell = config.cell_size;
    let max_stitches = placements.iter().map(|r| r.stitches.len()).max().unwrap_or(0);
    let width = (max_stitches as f64 * cell + config.padding * 2.0).max(config.min_size);
    let height = (placements.len() as f64 * cell + config.padding * 2.0).max(config.min_size);

    let rows = placements
        .iter()
        .map(|row| {
            let top = height - config.padding - (row.row_index + 1) as f64 * cell;
            let center_y = top + cell / 2.0;
            let cells = row
                .stitches
                .iter()
                .filter_map(|s| {
                    let stitch = pattern.stitch(row.row_index, s.stitch_index)?;
                    Some(ChartCell {
                        stitch_index: s.stitch_index,
                        center: Point::new(config.padding + s.stitch_index as f64 * cell + cell / 2.0, center_y),
                        rotation_deg: 0.0,
                        glyph: stitch.kind.glyph(),
                        fill: pattern.resolved_color(row.row_index, s.stitch_index).unwrap_or_default(),
                    })
                })
                .collect();

            ChartRow {
                row_index: row.row_index,
                label: format!("R{}", row.row_index + 1),
                label_anchor: Point::new(config.padding - 15.0, center_y + 4.0),
                ring: None,
                cells,
            }
        })
        .collect();

    ChartLayout {
        title: pattern.name.clone(),
        mode: ConstructionMode::Flat,
        width,
        height,
        rows,
        hit_radius: (cell - CELL_GAP) / 2.0,
    }
}

/// Ring radius per round, kept strictly nested.
fn ring_radii(placements: &[RowPlacement], config: &ChartConfig) -> Vec<f64> {
    let mut previous = 0.0_f64;
    placements
        .iter()
        .map(|row| {
            let scaled = config.ring_base + row.radius.unwrap_or(0.0) * config.px_per_unit;
            previous = scaled.max(previous + config.min_ring_gap);
            previous
        })
        .collect()
}

fn round_layout(pattern: &Pattern, placements: &[RowPlacement], config: &ChartConfig) -> ChartLayout {
    let rings = ring_radii(placements, config);
    let outer = rings.last().copied().unwrap_or(0.0);
    let side = (2.0 * (outer + config.padding + config.label_margin)).max(config.min_size);
    let center = Point::new(side / 2.0, side / 2.0);

    let rows = placements
        .iter()
        .zip(&rings)
        .map(|(row, &ring)| {
            let n = row.stitches.len();
            let cells = row
                .stitches
                .iter()
                .filter_map(|s| {
                    let stitch = pattern.stitch(row.row_index, s.stitch_index)?;
                    let angle = s.angle.unwrap_or_else(|| round_angle(s.stitch_index, n));
                    // 12 o'clock start; glyphs point away from the center
                    let screen_angle = angle - FRAC_PI_2;
                    Some(ChartCell {
                        stitch_index: s.stitch_index,
                        center: Point::polar(center, ring, screen_angle),
                        rotation_deg: screen_angle.to_degrees() + 90.0,
                        glyph: stitch.kind.glyph(),
                        fill: pattern.resolved_color(row.row_index, s.stitch_index).unwrap_or_default(),
                    })
                })
                .collect();

            ChartRow {
                row_index: row.row_index,
                label: format!("R{}", row.row_index + 1),
                label_anchor: Point::new(center.x + ring + 10.0, center.y),
                ring: Some(ring),
                cells,
            }
        })
        .collect();

    ChartLayout {
        title: pattern.name.clone(),
        mode: ConstructionMode::Round,
        width: side,
        height: side,
        rows,
        hit_radius: config.stitch_radius,
    }
}

// ============================================================================
// Scene graph
// ============================================================================

/// A node in the 2D chart scene.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartNode {
    Group {
        id: String,
        children: Vec<ChartNode>,
    },
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        corner_radius: f64,
        fill: Color,
        opacity: f64,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Option<Color>,
        /// Dashed outline color (guide rings).
        stroke: Option<Color>,
        opacity: f64,
    },
    Text {
        position: Point,
        /// Baseline shift applied after rotation.
        dy: f64,
        content: String,
        size: f64,
        rotation_deg: f64,
        centered: bool,
        fill: Color,
    },
}

impl ChartNode {
    /// This node plus all descendants.
    pub fn count(&self) -> usize {
        match self {
            ChartNode::Group { children, .. } => 1 + children.iter().map(ChartNode::count).sum::<usize>(),
            _ => 1,
        }
    }

    fn write_svg(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        match self {
            ChartNode::Group { id, children } => {
                out.push_str(&format!("{}<g id=\"{}\">\n", indent, quick_xml::escape::escape(id.as_str())));
                for child in children {
                    child.write_svg(out, depth + 1);
                }
                out.push_str(&format!("{}</g>\n", indent));
            }
            ChartNode::Rect { origin, width, height, corner_radius, fill, opacity } => {
                out.push_str(&format!(
                    "{}<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{:.2}\" fill=\"{}\" opacity=\"{:.2}\"/>\n",
                    indent, origin.x, origin.y, width, height, corner_radius, fill, opacity
                ));
            }
            ChartNode::Circle { center, radius, fill, stroke, opacity } => {
                let fill = fill.map_or_else(|| "none".to_string(), |c| c.to_hex());
                let stroke = stroke
                    .map(|c| format!(" stroke=\"{}\" stroke-width=\"1\" stroke-dasharray=\"4 4\"", c))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "{}<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"{} opacity=\"{:.2}\"/>\n",
                    indent, center.x, center.y, radius, fill, stroke, opacity
                ));
            }
            ChartNode::Text { position, dy, content, size, rotation_deg, centered, fill } => {
                let anchor = if *centered { " text-anchor=\"middle\"" } else { "" };
                let rotate = if *rotation_deg != 0.0 {
                    format!(" transform=\"rotate({:.2} {:.2} {:.2})\"", rotation_deg, position.x, position.y)
                } else {
                    String::new()
                };
                out.push_str(&format!(
                    "{}<text x=\"{:.2}\" y=\"{:.2}\" dy=\"{:.2}\" font-size=\"{:.1}\" font-weight=\"bold\"{}{} fill=\"{}\">{}</text>\n",
                    indent,
                    position.x,
                    position.y,
                    dy,
                    size,
                    anchor,
                    rotate,
                    fill,
                    quick_xml::escape::escape(content.as_str())
                ));
            }
        }
    }
}

/// The rendered chart: canvas size plus the node tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<ChartNode>,
}

impl ChartScene {
    /// Build the scene graph for a chart layout.
    pub fn from_layout(layout: &ChartLayout, config: &ChartConfig) -> ChartScene {
        let mut nodes: Vec<ChartNode> = layout
            .rows
            .iter()
            .map(|row| ChartNode::Group {
                id: format!("row-{}", row.row_index + 1),
                children: row_nodes(layout, row, config),
            })
            .collect();

        if layout.mode == ConstructionMode::Round {
            nodes.push(ChartNode::Circle {
                center: layout.content_center(),
                radius: 5.0,
                fill: Some(MARKER_COLOR),
                stroke: None,
                opacity: 0.2,
            });
        }

        ChartScene {
            title: layout.title.clone(),
            width: layout.width,
            height: layout.height,
            nodes,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(ChartNode::count).sum()
    }

    /// Top-level group with the given id.
    pub fn group(&self, id: &str) -> Option<&[ChartNode]> {
        self.nodes.iter().find_map(|node| match node {
            ChartNode::Group { id: group_id, children } if group_id == id => Some(children.as_slice()),
            _ => None,
        })
    }

    /// Serialize to a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg"
     width="{:.2}" height="{:.2}"
     viewBox="0 0 {:.2} {:.2}"
     font-family="system-ui, -apple-system, sans-serif">
  <title>{}</title>
  <rect width="100%" height="100%" fill="white"/>
"##,
            self.width,
            self.height,
            self.width,
            self.height,
            quick_xml::escape::escape(self.title.as_str())
        ));
        for node in &self.nodes {
            node.write_svg(&mut svg, 1);
        }
        svg.push_str("</svg>\n");
        svg
    }
}

fn row_nodes(layout: &ChartLayout, row: &ChartRow, config: &ChartConfig) -> Vec<ChartNode> {
    let mut children = Vec::with_capacity(row.cells.len() + 2);

    if let Some(ring) = row.ring {
        children.push(ChartNode::Circle {
            center: layout.content_center(),
            radius: ring,
            fill: None,
            stroke: Some(GUIDE_COLOR),
            opacity: 1.0,
        });
    }

    for cell in &row.cells {
        children.push(ChartNode::Group {
            id: format!("r{}-s{}", row.row_index + 1, cell.stitch_index + 1),
            children: cell_nodes(layout.mode, cell, config),
        });
    }

    children.push(ChartNode::Text {
        position: row.label_anchor,
        dy: 0.0,
        content: row.label.clone(),
        size: config.label_size,
        rotation_deg: 0.0,
        centered: false,
        fill: LABEL_COLOR,
    });
    children
}

fn cell_nodes(mode: ConstructionMode, cell: &ChartCell, config: &ChartConfig) -> Vec<ChartNode> {
    match mode {
        ConstructionMode::Flat => {
            // Drawn square and hit region are the same box.
            let side = config.cell_size - CELL_GAP;
            vec![
                ChartNode::Rect {
                    origin: Point::new(cell.center.x - side / 2.0, cell.center.y - side / 2.0),
                    width: side,
                    height: side,
                    corner_radius: 4.0,
                    fill: cell.fill,
                    opacity: config.fill_opacity,
                },
                ChartNode::Text {
                    position: cell.center,
                    dy: 4.0,
                    content: cell.glyph.to_string(),
                    size: config.flat_glyph_size,
                    rotation_deg: 0.0,
                    centered: true,
                    fill: GLYPH_COLOR,
                },
            ]
        }
        ConstructionMode::Round => vec![
            ChartNode::Circle {
                center: cell.center,
                radius: config.stitch_radius,
                fill: Some(cell.fill),
                stroke: None,
                opacity: config.fill_opacity,
            },
            ChartNode::Text {
                position: cell.center,
                dy: 4.0,
                content: cell.glyph.to_string(),
                size: config.round_glyph_size,
                rotation_deg: cell.rotation_deg,
                centered: true,
                fill: GLYPH_COLOR,
            },
        ],
    }
}

/// Lay out and render in one go.
pub fn render_chart(pattern: &Pattern, placements: &[RowPlacement], config: &ChartConfig) -> ChartScene {
    ChartScene::from_layout(&chart_layout(pattern, placements, config), config)
}
