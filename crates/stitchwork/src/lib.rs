//! # stitchwork
//!
//! Pattern geometry and projection engine for crochet patterns.
//!
//! A [`Pattern`] (rows of typed stitches, worked FLAT or ROUND) is laid out
//! once by [`layout`], and that single placement pass feeds both views:
//!
//! - [`solid::build_scene`]: procedural 3D meshes, one swept body and one
//!   loop ring per stitch
//! - [`chart::render_chart`]: a 2D symbol chart with SVG output
//!
//! [`Viewport`] maps pointer input onto the chart under pan/zoom, and
//! [`Session`] ties it together: apply an event, recompute everything.
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Unlike Node.js, you must explicitly declare every module.

pub mod chart;
pub mod color;
pub mod config;
pub mod curve;
pub mod error;
pub mod events;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod session;
pub mod solid;
pub mod stitch;
pub mod summary;
pub mod viewport;

// Re-export common types at crate root for convenience.
pub use chart::{chart_layout, render_chart, ChartConfig, ChartLayout, ChartNode, ChartScene};
pub use color::Color;
pub use config::EngineConfig;
pub use error::EngineError;
pub use events::{parse_command, suggestion_prompt, Feedback, LineDecoder, NoFeedback, PatternEvent};
pub use geometry::{DVec3, Point};
pub use layout::{layout, LayoutConfig, RowPlacement, StitchPlacement};
pub use model::{ColorEdit, ConstructionMode, Pattern, Row, StitchInstance};
pub use session::{Frame, Session};
pub use solid::{build_connector_loop, build_scene, build_stitch_solid, Mesh, Scene3d, SolidConfig};
pub use stitch::{StitchKind, StitchType};
pub use summary::{summarize, PatternSummary};
pub use viewport::{ColorEditTarget, Viewport, ViewportConfig};
