//! Events entering the engine from outside.
//!
//! Hardware controllers, UI buttons and suggestion services never touch
//! geometry directly. They produce [`PatternEvent`]s which the session
//! applies to the pattern one at a time.
//!
//! The hardware bridge speaks a newline-delimited text protocol:
//!
//! ```text
//! preview:dc     select a stitch type without adding it
//! dc             add a stitch of that type
//! row            start a new row (extension)
//! undo           remove the last stitch (extension)
//! mode:flat      switch construction mode (extension)
//! ```
//!
//! Lines are trimmed and lower-cased; anything unrecognized is ignored.

use crate::model::{ColorEdit, ConstructionMode, Pattern};
use crate::stitch::StitchType;

/// A discrete change request.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternEvent {
    /// Select the type used by the next stitch trigger.
    Preview(StitchType),
    AddStitch(StitchType),
    AddRow,
    Undo,
    SetMode(ConstructionMode),
    Recolor(ColorEdit),
    /// Free text from a suggestion service. Stored, never applied.
    Suggestion(String),
}

/// Parse one protocol line.
pub fn parse_command(line: &str) -> Option<PatternEvent> {
    let command = line.trim().to_lowercase();
    if command.is_empty() {
        return None;
    }

    if let Some(name) = command.strip_prefix("preview:") {
        return StitchType::from_name(name).map(PatternEvent::Preview);
    }
    if let Some(name) = command.strip_prefix("mode:") {
        return ConstructionMode::from_name(name).map(PatternEvent::SetMode);
    }

    match command.as_str() {
        "row" | "newrow" => Some(PatternEvent::AddRow),
        "undo" => Some(PatternEvent::Undo),
        other => StitchType::from_name(other).map(PatternEvent::AddStitch),
    }
}

/// Reassembles lines from arbitrarily split chunks (serial reads don't
/// respect line boundaries).
#[derive(Debug, Default, Clone)]
pub struct LineDecoder {
    buffer: String,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every completed line (without the newline).
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);
        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);
        complete
            .lines()
            .map(|l| l.trim_end_matches('\r').to_string())
            .collect()
    }

    /// Decode and parse in one step, dropping unknown commands.
    pub fn push_events(&mut self, chunk: &str) -> Vec<PatternEvent> {
        self.push(chunk).iter().filter_map(|l| parse_command(l)).collect()
    }

    /// Partial line still waiting for its newline.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Flush the trailing partial line, if any.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        if rest.trim().is_empty() { None } else { Some(rest) }
    }
}

/// Side-channel cues for authoring actions (sounds, LEDs, haptics).
///
/// Injected into the session so the engine never reaches for a global
/// service. All methods default to doing nothing.
pub trait Feedback {
    fn stitch_added(&mut self, _stitch: StitchType) {}
    fn row_added(&mut self) {}
    fn undone(&mut self) {}
}

/// Feedback that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFeedback;

impl Feedback for NoFeedback {}

/// Plain-text request describing the pattern so far, for a service that
/// suggests the next row.
pub fn suggestion_prompt(pattern: &Pattern) -> String {
    let rows: Vec<Vec<&str>> = pattern
        .rows
        .iter()
        .map(|row| row.stitches.iter().map(|s| s.kind.name()).collect())
        .collect();
    let state = serde_json::to_string(&rows).unwrap_or_default();

    format!(
        "I am writing a crochet pattern in {} mode.\n\
         The current pattern state is:\n\
         {}\n\n\
         Suggest the logical next row or round for this pattern.\n\
         Return only a short string of crochet instructions \
         (e.g., \"Row 5: sc in each st around\" or \"Row 3: *sc, inc* repeat 6 times\").\n",
        pattern.mode.name().to_uppercase(),
        state
    )
}
