//! Pattern model: rows of typed stitches.
//!
//! A [`Pattern`] is treated as an immutable value. Every authoring
//! operation (`with_row`, `with_stitch`, `without_last`, `with_color`, ...)
//! returns a new pattern and leaves `self` untouched, so a layout pass can
//! never observe a half-applied edit.
//!
//! ## Rust Lesson #25: Arc and copy-on-write
//!
//! Rows live behind `Arc<Row>`. Cloning a pattern only bumps reference
//! counts; `Arc::make_mut` clones a row only when we are about to change
//! it and someone else still holds it. Untouched rows stay shared between
//! the old and the new pattern.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color::{Color, DEFAULT_STITCH_COLOR};
use crate::error::EngineError;
use crate::stitch::{StitchKind, StitchType};

/// Construction topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConstructionMode {
    /// Rows worked back and forth, stacked vertically.
    Flat,
    /// Rounds worked around a center.
    #[default]
    Round,
}

impl ConstructionMode {
    pub fn name(&self) -> &'static str {
        match self {
            ConstructionMode::Flat => "flat",
            ConstructionMode::Round => "round",
        }
    }

    pub fn from_name(name: &str) -> Option<ConstructionMode> {
        match name.trim().to_lowercase().as_str() {
            "flat" | "rows" => Some(ConstructionMode::Flat),
            "round" | "rounds" | "circle" => Some(ConstructionMode::Round),
            _ => None,
        }
    }
}

/// One stitch in a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StitchInstance {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: StitchKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

/// An ordered run of stitches. Position in `stitches` decides placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    #[serde(default)]
    pub stitches: Vec<StitchInstance>,
    /// Row default color, used by stitches without their own color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Row {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), stitches: Vec::new(), color: None }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stitches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stitches.is_empty()
    }

    /// Resolve the display color of stitch `index`: stitch, then row,
    /// then the global default. `None` only when the index is out of range.
    pub fn resolved_color(&self, index: usize) -> Option<Color> {
        let stitch = self.stitches.get(index)?;
        Some(stitch.color.or(self.color).unwrap_or(DEFAULT_STITCH_COLOR))
    }
}

/// A color assignment coming back from the color-edit overlay.
///
/// `stitch_index: None` recolors the whole row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorEdit {
    pub row_index: usize,
    pub stitch_index: Option<usize>,
    pub color: Color,
}

/// The whole pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    #[serde(default)]
    pub mode: ConstructionMode,
    #[serde(default)]
    pub rows: Vec<Arc<Row>>,
}

impl Default for Pattern {
    fn default() -> Self {
        Self::new("Untitled", ConstructionMode::default())
    }
}

impl Pattern {
    /// Create an empty pattern (zero rows).
    pub fn new(name: impl Into<String>, mode: ConstructionMode) -> Self {
        Self { name: name.into(), mode, rows: Vec::new() }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn stitch_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).sum()
    }

    /// Largest stitch count of any row (0 for an empty pattern).
    pub fn max_row_len(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    pub fn stitch(&self, row_index: usize, stitch_index: usize) -> Option<&StitchInstance> {
        self.rows.get(row_index)?.stitches.get(stitch_index)
    }

    /// Display color of a stitch, see [`Row::resolved_color`].
    pub fn resolved_color(&self, row_index: usize, stitch_index: usize) -> Option<Color> {
        self.rows.get(row_index)?.resolved_color(stitch_index)
    }

    // ------------------------------------------------------------------------
    // Authoring operations (each returns a new pattern)
    // ------------------------------------------------------------------------

    pub fn with_mode(&self, mode: ConstructionMode) -> Pattern {
        Pattern { mode, ..self.clone() }
    }

    pub fn with_name(&self, name: impl Into<String>) -> Pattern {
        Pattern { name: name.into(), ..self.clone() }
    }

    /// Append an empty row.
    pub fn with_row(&self) -> Pattern {
        let mut next = self.clone();
        let id = self.fresh_row_id();
        next.rows.push(Arc::new(Row::new(id)));
        next
    }

    /// Append a stitch to the last row, starting a first row if needed.
    /// The stitch gets its type's default color.
    pub fn with_stitch(&self, stitch_type: StitchType) -> Pattern {
        let mut next = if self.rows.is_empty() { self.with_row() } else { self.clone() };
        let id = next.fresh_stitch_id();
        let last = next.rows.len() - 1;
        Arc::make_mut(&mut next.rows[last]).stitches.push(StitchInstance {
            id,
            kind: StitchKind::Known(stitch_type),
            color: Some(stitch_type.default_color()),
        });
        next
    }

    /// Undo: drop the last stitch of the last row, or the last row itself
    /// when it is already empty. An empty pattern is returned unchanged.
    pub fn without_last(&self) -> Pattern {
        let mut next = self.clone();
        if next.rows.is_empty() {
            return next;
        }
        if next.rows.last().is_some_and(|row| row.is_empty()) {
            next.rows.pop();
        } else if let Some(last) = next.rows.last_mut() {
            Arc::make_mut(last).stitches.pop();
        }
        next
    }

    /// Apply a color edit. Edits naming a row or stitch that no longer
    /// exists leave the pattern unchanged.
    pub fn with_color(&self, edit: &ColorEdit) -> Pattern {
        let mut next = self.clone();
        if edit.row_index >= next.rows.len() {
            log::debug!("ignoring color edit for missing row {}", edit.row_index);
            return next;
        }

        let row = &mut next.rows[edit.row_index];
        match edit.stitch_index {
            Some(i) if i < row.len() => {
                Arc::make_mut(row).stitches[i].color = Some(edit.color);
            }
            Some(i) => {
                log::debug!("ignoring color edit for missing stitch {} in row {}", i, edit.row_index);
            }
            None => {
                let row = Arc::make_mut(row);
                row.color = Some(edit.color);
                for stitch in &mut row.stitches {
                    stitch.color = Some(edit.color);
                }
            }
        }
        next
    }

    // ------------------------------------------------------------------------
    // Ids
    // ------------------------------------------------------------------------

    fn fresh_row_id(&self) -> String {
        let taken: HashSet<&str> = self.rows.iter().map(|r| r.id.as_str()).collect();
        fresh_id('r', self.rows.len() + 1, &taken)
    }

    fn fresh_stitch_id(&self) -> String {
        let taken: HashSet<&str> = self
            .rows
            .iter()
            .flat_map(|r| r.stitches.iter().map(|s| s.id.as_str()))
            .collect();
        fresh_id('s', taken.len() + 1, &taken)
    }

    // ------------------------------------------------------------------------
    // Plain data form
    // ------------------------------------------------------------------------

    pub fn from_json(text: &str) -> Result<Pattern, EngineError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml(text: &str) -> Result<Pattern, EngineError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a pattern file. `.yaml`/`.yml` parse as YAML, anything else
    /// as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Pattern, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        if is_yaml_path(path) {
            Pattern::from_yaml(&content)
        } else {
            Pattern::from_json(&content)
        }
    }
}

/// True for `.yaml` / `.yml` paths.
pub fn is_yaml_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase()).as_deref(),
        Some("yaml" | "yml")
    )
}

fn fresh_id(prefix: char, start: usize, taken: &HashSet<&str>) -> String {
    (start..)
        .map(|n| format!("{}{}", prefix, n))
        .find(|id| !taken.contains(id.as_str()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    fn sample() -> Pattern {
        Pattern::new("Sample", ConstructionMode::Flat)
            .with_stitch(StitchType::Sc)
            .with_stitch(StitchType::Dc)
            .with_row()
            .with_stitch(StitchType::Tr)
    }

    #[test]
    fn new_pattern_is_empty() {
        let p = Pattern::new("Empty", ConstructionMode::Round);
        assert_eq!(p.row_count(), 0);
        assert_eq!(p.stitch_count(), 0);
        assert_eq!(p.max_row_len(), 0);
    }

    #[test]
    fn first_stitch_creates_row() {
        let p = Pattern::default().with_stitch(StitchType::Sc);
        assert_eq!(p.row_count(), 1);
        assert_eq!(p.rows[0].len(), 1);
        assert_eq!(p.rows[0].stitches[0].color, Some(StitchType::Sc.default_color()));
    }

    #[test]
    fn stitches_go_to_last_row() {
        let p = sample();
        assert_eq!(p.rows[0].len(), 2);
        assert_eq!(p.rows[1].len(), 1);
        assert_eq!(p.stitch_count(), 3);
    }

    #[test]
    fn authoring_leaves_original_untouched() {
        let before = sample();
        let after = before.with_stitch(StitchType::Hdc);
        assert_eq!(before.rows[1].len(), 1);
        assert_eq!(after.rows[1].len(), 2);
        // Untouched row is shared, not copied
        assert!(Arc::ptr_eq(&before.rows[0], &after.rows[0]));
    }

    #[test]
    fn ids_are_unique() {
        let p = sample().with_stitch(StitchType::Sc).without_last().with_stitch(StitchType::Dc);
        let mut ids: Vec<&str> = p.rows.iter().flat_map(|r| r.stitches.iter().map(|s| s.id.as_str())).collect();
        let n = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), n);
        assert_ne!(p.rows[0].id, p.rows[1].id);
    }

    #[test]
    fn undo_removes_stitch_then_empty_row() {
        let p = sample().with_row();
        let p = p.without_last();
        assert_eq!(p.row_count(), 2, "empty trailing row removed first");
        let p = p.without_last();
        assert_eq!(p.row_count(), 2);
        assert!(p.rows[1].is_empty());
        let p = p.without_last();
        assert_eq!(p.row_count(), 1);
    }

    #[test]
    fn undo_on_empty_pattern_is_noop() {
        let p = Pattern::default();
        assert_eq!(p.without_last(), p);
    }

    #[test]
    fn stitch_color_edit() {
        let p = sample().with_color(&ColorEdit { row_index: 0, stitch_index: Some(1), color: color::PINK });
        assert_eq!(p.resolved_color(0, 1), Some(color::PINK));
        assert_eq!(p.resolved_color(0, 0), Some(StitchType::Sc.default_color()));
    }

    #[test]
    fn row_color_edit_sets_default_and_stitches() {
        let p = sample().with_color(&ColorEdit { row_index: 0, stitch_index: None, color: color::MINT });
        assert_eq!(p.rows[0].color, Some(color::MINT));
        assert!(p.rows[0].stitches.iter().all(|s| s.color == Some(color::MINT)));
        assert_eq!(p.rows[1].color, None);
    }

    #[test]
    fn stale_color_edit_is_noop() {
        let p = Pattern::new("T", ConstructionMode::Flat)
            .with_stitch(StitchType::Sc)
            .with_stitch(StitchType::Sc)
            .without_last();
        let edited = p.with_color(&ColorEdit { row_index: 0, stitch_index: Some(1), color: color::BLACK });
        assert_eq!(edited, p);
        let edited = p.with_color(&ColorEdit { row_index: 7, stitch_index: None, color: color::BLACK });
        assert_eq!(edited, p);
    }

    #[test]
    fn color_falls_back_to_row_then_default() {
        let mut row = Row::new("r1");
        row.stitches.push(StitchInstance { id: "s1".into(), kind: StitchType::Sc.into(), color: None });
        assert_eq!(row.resolved_color(0), Some(DEFAULT_STITCH_COLOR));
        row.color = Some(color::CORAL);
        assert_eq!(row.resolved_color(0), Some(color::CORAL));
        assert_eq!(row.resolved_color(1), None);
    }

    #[test]
    fn json_round_trip_keeps_ids_and_colors() {
        let p = sample().with_color(&ColorEdit { row_index: 1, stitch_index: None, color: color::SEAFOAM });
        let json = p.to_json_pretty().unwrap();
        assert!(json.contains("\"mode\": \"FLAT\""));
        assert!(json.contains("\"type\": \"tr\""));
        let back = Pattern::from_json(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn loads_plain_export_shape() {
        let json = r##"{
            "name": "Imported",
            "mode": "ROUND",
            "rows": [
                {"id": "a", "stitches": [{"id": "x", "type": "sc"}, {"id": "y", "type": "bobble", "color": "#ff9999"}]},
                {"id": "b", "stitches": []}
            ]
        }"##;
        let p = Pattern::from_json(json).unwrap();
        assert_eq!(p.mode, ConstructionMode::Round);
        assert_eq!(p.row_count(), 2);
        assert_eq!(p.rows[0].stitches[1].kind, StitchKind::Unrecognized("bobble".into()));
        assert_eq!(p.resolved_color(0, 0), Some(DEFAULT_STITCH_COLOR));
        // Fresh ids don't collide with loaded ones
        let p = p.with_stitch(StitchType::Dc);
        assert_eq!(p.rows[1].stitches[0].id, "s3");
    }

    #[test]
    fn yaml_loads() {
        let yaml = "name: Yaml\nmode: FLAT\nrows:\n  - id: r1\n    stitches:\n      - id: s1\n        type: dc\n";
        let p = Pattern::from_yaml(yaml).unwrap();
        assert_eq!(p.mode, ConstructionMode::Flat);
        assert_eq!(p.stitch(0, 0).map(|s| s.kind.clone()), Some(StitchKind::Known(StitchType::Dc)));
    }

    #[test]
    fn bad_input_is_parse_error() {
        assert!(matches!(Pattern::from_json("{"), Err(EngineError::Parse(_))));
        let bad_color = r#"{"name": "x", "rows": [{"id": "r", "stitches": [{"id": "s", "type": "sc", "color": "nope"}]}]}"#;
        assert!(Pattern::from_json(bad_color).is_err());
    }

    #[test]
    fn mode_names() {
        assert_eq!(ConstructionMode::from_name("FLAT"), Some(ConstructionMode::Flat));
        assert_eq!(ConstructionMode::from_name("round"), Some(ConstructionMode::Round));
        assert_eq!(ConstructionMode::from_name("spiral"), None);
    }

    #[test]
    fn yaml_extension_detection() {
        assert!(is_yaml_path(Path::new("a.yaml")));
        assert!(is_yaml_path(Path::new("a.YML")));
        assert!(!is_yaml_path(Path::new("a.json")));
    }
}
