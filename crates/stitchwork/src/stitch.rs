//! Stitch types and their intrinsic properties.
//!
//! Every stitch kind has a fixed height (drives the 3D sweep), a default
//! display color, a chart glyph and the base/top widths of its swept
//! profile. The table is immutable and keyed by [`StitchType`].

use serde::{Deserialize, Serialize};

use crate::color::{self, Color};

/// Height used for stitch kinds this build doesn't know.
pub const FALLBACK_HEIGHT: f64 = 0.6;

/// Chart glyph used for stitch kinds this build doesn't know.
pub const FALLBACK_GLYPH: char = '?';

/// Sweep widths (base, top) for ordinary stitches.
const STANDARD_WIDTHS: (f64, f64) = (-0.25, 0.25);

/// Metadata describing a stitch type for UI display.
#[derive(Debug, Clone, Copy)]
pub struct StitchMetadata {
    /// Human-readable name
    pub label: &'static str,
    /// Brief description
    pub description: &'static str,
}

impl StitchMetadata {
    pub const fn new(label: &'static str, description: &'static str) -> Self {
        Self { label, description }
    }
}

/// Available stitch types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StitchType {
    /// Single crochet
    Sc,
    /// Double crochet
    Dc,
    /// Half double crochet
    Hdc,
    /// Treble crochet
    Tr,
    /// Increase (two stitches worked into one base)
    Inc,
    /// Decrease (two stitches closed together)
    Dec,
    /// Slip stitch
    SlSt,
}

impl StitchType {
    /// Get all available stitch types.
    pub fn all() -> &'static [StitchType] {
        &[
            StitchType::Sc,
            StitchType::Dc,
            StitchType::Hdc,
            StitchType::Tr,
            StitchType::Inc,
            StitchType::Dec,
            StitchType::SlSt,
        ]
    }

    /// Short name as used in patterns and the device protocol.
    pub fn name(&self) -> &'static str {
        match self {
            StitchType::Sc => "sc",
            StitchType::Dc => "dc",
            StitchType::Hdc => "hdc",
            StitchType::Tr => "tr",
            StitchType::Inc => "inc",
            StitchType::Dec => "dec",
            StitchType::SlSt => "slst",
        }
    }

    /// Parse stitch type from string (short names and common aliases).
    pub fn from_name(name: &str) -> Option<StitchType> {
        match name.trim().to_lowercase().as_str() {
            "sc" | "single" | "single-crochet" => Some(StitchType::Sc),
            "dc" | "double" | "double-crochet" => Some(StitchType::Dc),
            "hdc" | "half-double" | "half-double-crochet" => Some(StitchType::Hdc),
            "tr" | "treble" | "treble-crochet" => Some(StitchType::Tr),
            "inc" | "increase" => Some(StitchType::Inc),
            "dec" | "decrease" | "sc2tog" => Some(StitchType::Dec),
            "slst" | "sl-st" | "slip" => Some(StitchType::SlSt),
            _ => None,
        }
    }

    /// Intrinsic height in scene units.
    pub fn height(&self) -> f64 {
        match self {
            StitchType::Sc => 0.6,
            StitchType::Dc => 1.4,
            StitchType::Hdc => 1.0,
            StitchType::Tr => 1.8,
            StitchType::Inc => 0.6,
            StitchType::Dec => 0.7,
            StitchType::SlSt => 0.2,
        }
    }

    /// Color a freshly added stitch of this type gets.
    pub fn default_color(&self) -> Color {
        match self {
            StitchType::Sc => color::NATURAL,
            StitchType::Dc => color::SKY_BLUE,
            StitchType::Hdc => color::MINT,
            StitchType::Tr => color::LAVENDER,
            StitchType::Inc => color::PEACH,
            StitchType::Dec => color::PINK,
            StitchType::SlSt => color::CORAL,
        }
    }

    /// Chart symbol.
    pub fn glyph(&self) -> char {
        match self {
            StitchType::Sc => '×',
            StitchType::Dc => '†',
            StitchType::Hdc => 'T',
            StitchType::Tr => '‡',
            StitchType::Inc => '∨',
            StitchType::Dec => '∧',
            StitchType::SlSt => '•',
        }
    }

    /// Profile widths (base, top) of the swept solid.
    ///
    /// Decreases start wide and increases end wide; everything else leans
    /// the same way.
    pub fn sweep_widths(&self) -> (f64, f64) {
        match self {
            StitchType::Dec => (0.4, STANDARD_WIDTHS.1),
            StitchType::Inc => (STANDARD_WIDTHS.0, 0.35),
            _ => STANDARD_WIDTHS,
        }
    }

    /// Get UI metadata for this stitch type.
    pub fn metadata(&self) -> StitchMetadata {
        match self {
            StitchType::Sc => StitchMetadata::new("Single crochet", "Standard short stitch (about 1 chain tall)"),
            StitchType::Dc => StitchMetadata::new("Double crochet", "Tall stitch (about 3 chains tall)"),
            StitchType::Hdc => StitchMetadata::new("Half double crochet", "Medium stitch (about 2 chains tall)"),
            StitchType::Tr => StitchMetadata::new("Treble crochet", "Extra tall stitch (about 4 chains tall)"),
            StitchType::Inc => StitchMetadata::new("Increase", "Two stitches worked into the same base"),
            StitchType::Dec => StitchMetadata::new("Decrease", "Two stitches closed together at the top"),
            StitchType::SlSt => StitchMetadata::new("Slip stitch", "Very short stitch used for joining"),
        }
    }
}

/// The kind recorded on a stitch instance.
///
/// Patterns come from outside (files, other builds), so a stitch may name
/// a kind this build has no entry for. Instead of rejecting the whole
/// pattern we keep the name, render it with fallbacks, and write it back
/// out unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StitchKind {
    Known(StitchType),
    Unrecognized(String),
}

impl StitchKind {
    /// The known type, if any.
    pub fn known(&self) -> Option<StitchType> {
        match self {
            StitchKind::Known(t) => Some(*t),
            StitchKind::Unrecognized(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StitchKind::Known(t) => t.name(),
            StitchKind::Unrecognized(name) => name,
        }
    }

    /// Height, falling back to [`FALLBACK_HEIGHT`] for unknown kinds.
    pub fn height(&self) -> f64 {
        match self {
            StitchKind::Known(t) => t.height(),
            StitchKind::Unrecognized(name) => {
                log::debug!("unknown stitch type '{}', using fallback height {}", name, FALLBACK_HEIGHT);
                FALLBACK_HEIGHT
            }
        }
    }

    pub fn glyph(&self) -> char {
        self.known().map_or(FALLBACK_GLYPH, |t| t.glyph())
    }

    pub fn sweep_widths(&self) -> (f64, f64) {
        self.known().map_or(STANDARD_WIDTHS, |t| t.sweep_widths())
    }
}

impl From<StitchType> for StitchKind {
    fn from(t: StitchType) -> Self {
        StitchKind::Known(t)
    }
}

impl From<String> for StitchKind {
    fn from(name: String) -> Self {
        match StitchType::from_name(&name) {
            Some(t) => StitchKind::Known(t),
            None => {
                log::warn!("unknown stitch type '{}', drawing it with fallbacks", name);
                StitchKind::Unrecognized(name)
            }
        }
    }
}

impl From<StitchKind> for String {
    fn from(kind: StitchKind) -> Self {
        kind.name().to_string()
    }
}
