//! Yarn colors.
//!
//! Colors travel through patterns as `#rrggbb` strings, but any CSS color
//! svgtypes understands (`red`, `rgb(10, 20, 30)`, `#abc`) is accepted on
//! input and normalized to hex on output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

// Preset yarn palette.
pub const NATURAL: Color = Color::rgb(0xf0, 0xe6, 0xdc);
pub const CORAL: Color = Color::rgb(0xff, 0x99, 0x99);
pub const SKY_BLUE: Color = Color::rgb(0x99, 0xcc, 0xff);
pub const MINT: Color = Color::rgb(0xcc, 0xff, 0x99);
pub const PEACH: Color = Color::rgb(0xff, 0xcc, 0x99);
pub const PINK: Color = Color::rgb(0xff, 0x99, 0xcc);
pub const SEAFOAM: Color = Color::rgb(0x99, 0xff, 0xcc);
pub const LAVENDER: Color = Color::rgb(0xcc, 0xcc, 0xff);
pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

/// Colors offered by the color-edit overlay, in display order.
pub const PALETTE: [Color; 10] = [
    NATURAL, CORAL, SKY_BLUE, MINT, PEACH, PINK, SEAFOAM, LAVENDER, WHITE, BLACK,
];

/// Color used whenever neither the stitch nor its row names one.
pub const DEFAULT_STITCH_COLOR: Color = NATURAL;

impl Color {
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse any CSS color. Alpha is dropped.
    pub fn parse(text: &str) -> Option<Color> {
        svgtypes::Color::from_str(text.trim())
            .ok()
            .map(|c| Color::rgb(c.red, c.green, c.blue))
    }

    /// `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels as 0.0-1.0 floats, for material colors.
    pub fn to_unit_rgb(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        DEFAULT_STITCH_COLOR
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s).ok_or_else(|| EngineError::Parse(format!("invalid color '{}'", s)))
    }
}

// ## Rust Lesson #24: Custom serde impls
//
// Deriving would give `{"r":..,"g":..,"b":..}`. Patterns store colors as
// strings, so we write the two small impls by hand.

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
