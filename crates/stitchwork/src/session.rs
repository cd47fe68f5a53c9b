//! Authoring session: the engine's single entry point for changes.
//!
//! A [`Session`] owns the current pattern snapshot and everything derived
//! from it. Each event produces a new pattern; if it differs from the old
//! one, the whole [`Frame`] (placements, 3D scene, chart, summary) is
//! recomputed from it before the call returns. Nothing can observe a frame
//! built from two different snapshots.

use crate::chart::{chart_layout, ChartLayout, ChartScene};
use crate::color::Color;
use crate::config::EngineConfig;
use crate::events::{Feedback, NoFeedback, PatternEvent};
use crate::geometry::Point;
use crate::layout::{layout, RowPlacement};
use crate::model::Pattern;
use crate::solid::{build_scene, Scene3d};
use crate::stitch::StitchType;
use crate::summary::{summarize, PatternSummary};
use crate::viewport::{ColorEditTarget, Viewport};

/// Everything derived from one pattern snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub placements: Vec<RowPlacement>,
    pub scene: Scene3d,
    pub chart: ChartLayout,
    pub chart_scene: ChartScene,
    pub summary: PatternSummary,
}

impl Frame {
    /// Full recompute. No caching between frames.
    pub fn compute(pattern: &Pattern, config: &EngineConfig) -> Frame {
        let placements = layout(pattern, &config.layout);
        let scene = build_scene(pattern, &placements, &config.solid);
        let chart = chart_layout(pattern, &placements, &config.chart);
        let chart_scene = ChartScene::from_layout(&chart, &config.chart);
        let summary = summarize(pattern);

        log::debug!(
            "frame: {} rows, {} stitches, {} triangles, {} chart nodes",
            placements.len(),
            summary.stitch_count,
            scene.triangle_count(),
            chart_scene.node_count()
        );

        Frame { placements, scene, chart, chart_scene, summary }
    }
}

/// Single-threaded authoring session.
///
/// `F` receives cues for stitch/row/undo actions; the default ignores them.
pub struct Session<F: Feedback = NoFeedback> {
    config: EngineConfig,
    pattern: Pattern,
    frame: Frame,
    viewport: Viewport,
    selected: StitchType,
    suggestion: Option<String>,
    feedback: F,
}

impl Session<NoFeedback> {
    pub fn new(config: EngineConfig) -> Self {
        Session::with_feedback(config, NoFeedback)
    }
}

impl<F: Feedback> Session<F> {
    /// Start with an empty pattern.
    pub fn with_feedback(config: EngineConfig, feedback: F) -> Self {
        let pattern = Pattern::default();
        let frame = Frame::compute(&pattern, &config);
        let mut viewport = Viewport::new(config.viewport.clone());
        viewport.set_content(&frame.chart);

        Self {
            config,
            pattern,
            frame,
            viewport,
            selected: StitchType::Sc,
            suggestion: None,
            feedback,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Pan/zoom/pointer input goes straight to the viewport.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Type used by [`Session::add_selected_stitch`].
    pub fn selected(&self) -> StitchType {
        self.selected
    }

    /// Latest suggestion text, if any.
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Swap in a whole pattern (e.g. one loaded from disk).
    pub fn replace_pattern(&mut self, pattern: Pattern) {
        self.viewport.close_overlay();
        self.commit(pattern);
    }

    /// Apply one event. Returns true when the pattern changed.
    pub fn apply(&mut self, event: PatternEvent) -> bool {
        match event {
            PatternEvent::Preview(t) => {
                self.selected = t;
                false
            }
            PatternEvent::AddStitch(t) => {
                let next = self.pattern.with_stitch(t);
                self.feedback.stitch_added(t);
                self.commit(next)
            }
            PatternEvent::AddRow => {
                let next = self.pattern.with_row();
                self.feedback.row_added();
                self.commit(next)
            }
            PatternEvent::Undo => {
                if self.pattern.row_count() == 0 {
                    return false;
                }
                let next = self.pattern.without_last();
                self.feedback.undone();
                self.commit(next)
            }
            PatternEvent::SetMode(mode) => {
                let next = self.pattern.with_mode(mode);
                self.commit(next)
            }
            PatternEvent::Recolor(edit) => {
                let next = self.pattern.with_color(&edit);
                self.commit(next)
            }
            PatternEvent::Suggestion(text) => {
                self.suggestion = Some(text);
                false
            }
        }
    }

    /// Apply events in order. Returns how many changed the pattern.
    pub fn apply_all<I: IntoIterator<Item = PatternEvent>>(&mut self, events: I) -> usize {
        events.into_iter().filter(|e| self.apply(e.clone())).count()
    }

    /// Add a stitch of the currently selected type.
    pub fn add_selected_stitch(&mut self) -> bool {
        self.apply(PatternEvent::AddStitch(self.selected))
    }

    // ------------------------------------------------------------------------
    // Chart interaction
    // ------------------------------------------------------------------------

    /// Click on the chart at a screen point. Opens the color-edit overlay
    /// when it lands on a stitch.
    pub fn click(&mut self, screen: Point) -> Option<ColorEditTarget> {
        self.viewport.click(screen, &self.frame.chart)
    }

    /// Where the open overlay should be drawn, in screen space.
    pub fn overlay_anchor(&self) -> Option<Point> {
        self.viewport.overlay_anchor(&self.frame.chart)
    }

    /// Recolor the overlay's stitch and close the overlay.
    pub fn pick_color(&mut self, color: Color) -> bool {
        match self.viewport.apply_overlay_color(color) {
            Some(edit) => self.apply(PatternEvent::Recolor(edit)),
            None => false,
        }
    }

    /// Recolor the overlay stitch's whole row and close the overlay.
    pub fn pick_row_color(&mut self, color: Color) -> bool {
        match self.viewport.apply_overlay_row_color(color) {
            Some(edit) => self.apply(PatternEvent::Recolor(edit)),
            None => false,
        }
    }

    // Swap snapshots and rebuild the frame.
    fn commit(&mut self, next: Pattern) -> bool {
        if next == self.pattern {
            return false;
        }
        self.pattern = next;
        self.frame = Frame::compute(&self.pattern, &self.config);
        self.viewport.set_content(&self.frame.chart);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::events::parse_command;
    use crate::model::{ColorEdit, ConstructionMode};

    #[derive(Default)]
    struct Recorder {
        cues: Vec<String>,
    }

    impl Feedback for Recorder {
        fn stitch_added(&mut self, stitch: StitchType) {
            self.cues.push(stitch.name().to_string());
        }
        fn row_added(&mut self) {
            self.cues.push("row".to_string());
        }
        fn undone(&mut self) {
            self.cues.push("undo".to_string());
        }
    }

    #[test]
    fn starts_empty_and_valid() {
        let s = Session::new(EngineConfig::default());
        assert_eq!(s.pattern().row_count(), 0);
        assert!(s.frame().placements.is_empty());
        assert!(s.frame().scene.is_empty());
        assert_eq!(s.frame().chart.width, 200.0);
    }

    #[test]
    fn every_change_recomputes_frame() {
        let mut s = Session::new(EngineConfig::default());
        assert!(s.apply(PatternEvent::AddStitch(StitchType::Sc)));
        assert!(s.apply(PatternEvent::AddStitch(StitchType::Dc)));
        assert_eq!(s.frame().scene.solids.len(), 2);
        assert_eq!(s.frame().chart.cell_count(), 2);
        assert_eq!(s.frame().summary.lines(), vec!["R1: 1 SC, 1 DC".to_string()]);

        assert!(s.apply(PatternEvent::Undo));
        assert_eq!(s.frame().scene.solids.len(), 1);
    }

    #[test]
    fn preview_selects_without_changing() {
        let mut s = Session::new(EngineConfig::default());
        assert!(!s.apply(PatternEvent::Preview(StitchType::Tr)));
        assert_eq!(s.selected(), StitchType::Tr);
        assert!(s.add_selected_stitch());
        assert_eq!(s.pattern().rows[0].stitches[0].kind.known(), Some(StitchType::Tr));
    }

    #[test]
    fn suggestions_never_touch_geometry() {
        let mut s = Session::new(EngineConfig::default());
        s.apply(PatternEvent::AddStitch(StitchType::Sc));
        let before = s.frame().clone();
        assert!(!s.apply(PatternEvent::Suggestion("Row 2: inc around".into())));
        assert_eq!(s.suggestion(), Some("Row 2: inc around"));
        assert_eq!(s.frame(), &before);
    }

    #[test]
    fn feedback_hears_authoring_actions() {
        let mut s = Session::with_feedback(EngineConfig::default(), Recorder::default());
        let events = ["sc", "row", "dc", "undo", "preview:tr"]
            .iter()
            .filter_map(|l| parse_command(l));
        assert_eq!(s.apply_all(events), 4);
        assert_eq!(s.feedback().cues, vec!["sc", "row", "dc", "undo"]);
    }

    #[test]
    fn undo_on_empty_is_quiet() {
        let mut s = Session::with_feedback(EngineConfig::default(), Recorder::default());
        assert!(!s.apply(PatternEvent::Undo));
        assert!(s.feedback().cues.is_empty());
    }

    #[test]
    fn click_then_pick_recolors() {
        let mut s = Session::new(EngineConfig::default());
        s.apply(PatternEvent::SetMode(ConstructionMode::Flat));
        s.apply(PatternEvent::AddStitch(StitchType::Sc));
        s.apply(PatternEvent::AddStitch(StitchType::Sc));
        s.viewport_mut().set_container(640.0, 480.0);

        let cell = s.frame().chart.rows[0].cells[1].center;
        let screen = s.viewport().to_screen(cell);
        let target = s.click(screen).unwrap();
        assert_eq!(target.stitch_index, 1);
        assert_eq!(s.overlay_anchor(), Some(screen));

        assert!(s.pick_color(color::LAVENDER));
        assert_eq!(s.pattern().resolved_color(0, 1), Some(color::LAVENDER));
        assert_eq!(s.frame().chart.rows[0].cells[1].fill, color::LAVENDER);
        assert!(s.overlay_anchor().is_none());
    }

    #[test]
    fn stale_recolor_is_noop() {
        let mut s = Session::new(EngineConfig::default());
        s.apply(PatternEvent::AddStitch(StitchType::Sc));
        let edit = ColorEdit { row_index: 0, stitch_index: Some(4), color: color::BLACK };
        assert!(!s.apply(PatternEvent::Recolor(edit)));
    }

    #[test]
    fn mode_switch_relayouts() {
        let mut s = Session::new(EngineConfig::default());
        for _ in 0..6 {
            s.apply(PatternEvent::AddStitch(StitchType::Sc));
        }
        assert!(s.frame().placements[0].radius.is_some());
        assert!(s.apply(PatternEvent::SetMode(ConstructionMode::Flat)));
        assert!(s.frame().placements[0].radius.is_none());
        assert!(!s.apply(PatternEvent::SetMode(ConstructionMode::Flat)));
    }
}
