//! CLI command implementations.
//!
//! This module contains the implementations for the various CLI subcommands:
//! - `chart` - Render the 2D symbol chart (SVG, optional PNG)
//! - `mesh` - Export the 3D stitch scene as OBJ
//! - `summary` - Per-row stitch tallies
//! - `export` - Pattern as JSON or CSV
//! - `build` - Replay a device-protocol script into a pattern

pub mod common;
pub mod chart;
pub mod mesh;
pub mod summary;
pub mod export;
pub mod build;

pub use chart::cmd_chart;
pub use mesh::cmd_mesh;
pub use summary::cmd_summary;
pub use export::cmd_export;
pub use build::cmd_build;
