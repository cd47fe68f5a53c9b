//! Viewport transform for the chart: pan, zoom and pointer mapping.
//!
//! The chart is drawn scaled about its own center and then shifted by
//! `offset`, inside a container whose center is the reference point:
//!
//! ```text
//! screen = container_center + offset + (chart − content_center) × scale
//! chart  = content_center + (screen − container_center − offset) / scale
//! ```
//!
//! Everything pointer-driven goes through [`Viewport::to_chart`], and the
//! color-edit overlay is placed with [`Viewport::to_screen`], so the two
//! stay aligned at any pan/zoom.
//!
//! ## Drag gesture
//!
//! ```text
//!   Idle ──pointer_down──▶ Dragging { start, origin_offset, moved }
//!     ▲                        │ pointer_move: offset follows pointer,
//!     │                        │ moved once past the threshold
//!     └──pointer_up/leave──────┘
//! ```
//!
//! A release after real movement suppresses the next click, so panning
//! never selects a stitch by accident.

use serde::{Deserialize, Serialize};

use crate::chart::ChartLayout;
use crate::color::Color;
use crate::error::EngineError;
use crate::geometry::Point;
use crate::model::ColorEdit;

/// Interaction constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale change per zoom button press
    pub zoom_step: f64,
    /// Scale change per unit of wheel delta
    pub wheel_speed: f64,
    /// Pointer travel (px) before a press counts as a drag
    pub drag_threshold: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 5.0,
            zoom_step: 0.2,
            wheel_speed: 0.001,
            drag_threshold: 3.0,
        }
    }
}

impl ViewportConfig {
    /// Scale bounds must be finite, positive and ordered.
    pub fn validate(&self) -> Result<(), EngineError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.min_scale) || !positive(self.max_scale) {
            return Err(EngineError::Parse(format!(
                "viewport scale bounds must be finite and positive (min_scale: {}, max_scale: {})",
                self.min_scale, self.max_scale
            )));
        }
        if self.min_scale > self.max_scale {
            return Err(EngineError::Parse(format!(
                "viewport min_scale {} is above max_scale {}",
                self.min_scale, self.max_scale
            )));
        }
        Ok(())
    }
}

/// Drag gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        start: Point,
        origin_offset: Point,
        moved: bool,
    },
}

/// What the color-edit overlay is open on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorEditTarget {
    pub row_index: usize,
    pub stitch_index: usize,
    pub current_color: Color,
}

impl ColorEditTarget {
    /// Edit recoloring just this stitch.
    pub fn stitch_edit(&self, color: Color) -> ColorEdit {
        ColorEdit { row_index: self.row_index, stitch_index: Some(self.stitch_index), color }
    }

    /// Edit recoloring the target's whole row.
    pub fn row_edit(&self, color: Color) -> ColorEdit {
        ColorEdit { row_index: self.row_index, stitch_index: None, color }
    }
}

/// Pan/zoom state of the chart view.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    config: ViewportConfig,
    scale: f64,
    offset: Point,
    container: Point,
    content_center: Point,
    drag: DragState,
    suppress_click: bool,
    overlay: Option<ColorEditTarget>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            scale: 1.0,
            offset: Point::ORIGIN,
            container: Point::ORIGIN,
            content_center: Point::ORIGIN,
            drag: DragState::Idle,
            suppress_click: false,
            overlay: None,
        }
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn offset(&self) -> Point {
        self.offset
    }

    #[inline]
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    #[inline]
    pub fn overlay(&self) -> Option<&ColorEditTarget> {
        self.overlay.as_ref()
    }

    /// Size of the on-screen container. Non-finite or negative sizes are
    /// ignored.
    pub fn set_container(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0 {
            self.container = Point::new(width, height);
        }
    }

    /// Track the chart being shown (its center is the zoom origin).
    pub fn set_content(&mut self, layout: &ChartLayout) {
        self.content_center = layout.content_center();
    }

    // ------------------------------------------------------------------------
    // Zoom
    // ------------------------------------------------------------------------

    /// Set the scale, clamped to the allowed range. NaN is ignored.
    /// Crossed or NaN bounds in a hand-built config never panic.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_nan() {
            return;
        }
        self.scale = scale.max(self.config.min_scale).min(self.config.max_scale);
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - self.config.zoom_step);
    }

    /// Continuous zoom from a wheel event; scrolling up (negative delta)
    /// zooms in.
    pub fn zoom_wheel(&mut self, delta_y: f64) {
        if delta_y.is_finite() {
            self.set_scale(self.scale - delta_y * self.config.wheel_speed);
        }
    }

    // ------------------------------------------------------------------------
    // Drag
    // ------------------------------------------------------------------------

    pub fn pointer_down(&mut self, p: Point) {
        if !p.is_finite() {
            return;
        }
        self.suppress_click = false;
        self.drag = DragState::Dragging { start: p, origin_offset: self.offset, moved: false };
    }

    pub fn pointer_move(&mut self, p: Point) {
        if !p.is_finite() {
            return;
        }
        if let DragState::Dragging { start, origin_offset, moved } = &mut self.drag {
            if p.distance(*start) > self.config.drag_threshold {
                *moved = true;
            }
            self.offset = *origin_offset + (p - *start);
        }
    }

    /// End the gesture. Returns true when it was a drag (the paired click
    /// will be ignored).
    pub fn pointer_up(&mut self) -> bool {
        let moved = matches!(self.drag, DragState::Dragging { moved: true, .. });
        self.suppress_click = moved;
        self.drag = DragState::Idle;
        moved
    }

    /// Pointer left the container: the gesture is cancelled where it is.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    // ------------------------------------------------------------------------
    // Click & overlay
    // ------------------------------------------------------------------------

    /// Resolve a click against the chart.
    ///
    /// Hitting a stitch opens the color-edit overlay on it. Clicking empty
    /// space closes the overlay. A click that ends a drag does nothing.
    pub fn click(&mut self, p: Point, layout: &ChartLayout) -> Option<ColorEditTarget> {
        if std::mem::take(&mut self.suppress_click) {
            return None;
        }

        let hit = layout.hit_test(self.to_chart(p)).and_then(|(row_index, stitch_index)| {
            let cell = layout.cell(row_index, stitch_index)?;
            Some(ColorEditTarget { row_index, stitch_index, current_color: cell.fill })
        });
        self.overlay = hit;
        hit
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Screen position the overlay should point at, following pan and zoom.
    /// `None` when closed or when its stitch is gone from `layout`.
    pub fn overlay_anchor(&self, layout: &ChartLayout) -> Option<Point> {
        let target = self.overlay?;
        let cell = layout.cell(target.row_index, target.stitch_index)?;
        Some(self.to_screen(cell.center))
    }

    /// Pick a color for the overlay's stitch. Closes the overlay.
    pub fn apply_overlay_color(&mut self, color: Color) -> Option<ColorEdit> {
        self.overlay.take().map(|t| t.stitch_edit(color))
    }

    /// Pick a color for the overlay stitch's whole row. Closes the overlay.
    pub fn apply_overlay_row_color(&mut self, color: Color) -> Option<ColorEdit> {
        self.overlay.take().map(|t| t.row_edit(color))
    }

    // ------------------------------------------------------------------------
    // Mapping
    // ------------------------------------------------------------------------

    pub fn to_screen(&self, chart: Point) -> Point {
        self.container * 0.5 + self.offset + (chart - self.content_center) * self.scale
    }

    pub fn to_chart(&self, screen: Point) -> Point {
        self.content_center + (screen - self.container * 0.5 - self.offset) * (1.0 / self.scale)
    }

    /// Back to scale 1, no offset, no overlay, no gesture.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Point::ORIGIN;
        self.drag = DragState::Idle;
        self.suppress_click = false;
        self.overlay = None;
    }
}
