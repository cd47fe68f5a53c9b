//! Error type for the engine's input surfaces.
//!
//! Layout and rendering never fail: degenerate patterns, unknown stitch
//! kinds, stale selections and wild viewport input are all absorbed with
//! safe defaults. The only fallible calls are the ones that read text
//! from outside (pattern files, config files, color strings).
//!
//! ## Rust Lesson #20: Error Handling
//!
//! Rust uses `Result<T, E>` instead of exceptions:
//! - `Ok(value)` = success
//! - `Err(error)` = failure
//!
//! You MUST handle errors - the compiler won't let you ignore them!

use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// Input text could not be parsed (JSON, YAML or a color string).
    Parse(String),
    /// Reading input failed.
    Io(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Parse(msg) => write!(f, "parse error: {}", msg),
            EngineError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

// ## Rust Lesson #21: The ? Operator and From
//
// `?` calls `From::from` on the error before returning it, so these impls
// let `serde_json::from_str(..)?` bubble up as an `EngineError`.

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Parse(e.to_string())
    }
}

impl From<serde_yaml::Error> for EngineError {
    fn from(e: serde_yaml::Error) -> Self {
        EngineError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e.to_string())
    }
}
