//! Read-only pattern summary for status displays.
//!
//! Rows are described as a tally of stitch kinds in the order they first
//! appear, e.g. `R1: 6 SC, 2 DC`. Empty rows read `Empty`.

use serde::Serialize;

use crate::model::{ConstructionMode, Pattern, Row};

/// Count of one stitch kind within a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StitchTally {
    /// Upper-case kind name (`SC`, `DC`, ...).
    pub kind: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSummary {
    /// `R{n}`, 1-based.
    pub label: String,
    pub stitch_count: usize,
    pub tally: Vec<StitchTally>,
}

impl RowSummary {
    /// Tally text without the label (`6 SC, 2 DC` or `Empty`).
    pub fn text(&self) -> String {
        if self.tally.is_empty() {
            return "Empty".to_string();
        }
        self.tally
            .iter()
            .map(|t| format!("{} {}", t.count, t.kind))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternSummary {
    pub name: String,
    pub mode: ConstructionMode,
    pub row_count: usize,
    pub stitch_count: usize,
    pub rows: Vec<RowSummary>,
}

impl PatternSummary {
    /// One `R{n}: ...` line per row.
    pub fn lines(&self) -> Vec<String> {
        self.rows.iter().map(|r| format!("{}: {}", r.label, r.text())).collect()
    }
}

/// Tally a single row.
pub fn summarize_row(index: usize, row: &Row) -> RowSummary {
    let mut tally: Vec<StitchTally> = Vec::new();
    for stitch in &row.stitches {
        let kind = stitch.kind.name().to_uppercase();
        match tally.iter_mut().find(|t| t.kind == kind) {
            Some(t) => t.count += 1,
            None => tally.push(StitchTally { kind, count: 1 }),
        }
    }

    RowSummary { label: format!("R{}", index + 1), stitch_count: row.len(), tally }
}

pub fn summarize(pattern: &Pattern) -> PatternSummary {
    PatternSummary {
        name: pattern.name.clone(),
        mode: pattern.mode,
        row_count: pattern.row_count(),
        stitch_count: pattern.stitch_count(),
        rows: pattern
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| summarize_row(i, row))
            .collect(),
    }
}
