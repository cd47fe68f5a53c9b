//! Engine configuration.
//!
//! Every tunable constant lives in one of four sections. Each section
//! fills missing keys from its `Default`, so a config file only has to
//! name what it changes:
//!
//! ```yaml
//! chart:
//!   cell_size: 40
//! viewport:
//!   max_scale: 8
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::ChartConfig;
use crate::error::EngineError;
use crate::layout::LayoutConfig;
use crate::solid::SolidConfig;
use crate::viewport::ViewportConfig;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub layout: LayoutConfig,
    pub solid: SolidConfig,
    pub chart: ChartConfig,
    pub viewport: ViewportConfig,
}

impl EngineConfig {
    pub fn from_yaml(text: &str) -> Result<Self, EngineError> {
        serde_yaml::from_str::<Self>(text)?.validated()
    }

    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        serde_json::from_str::<Self>(text)?.validated()
    }

    /// Reject values the engine can't work with.
    pub fn validated(self) -> Result<Self, EngineError> {
        self.viewport.validate()?;
        Ok(self)
    }

    /// Load a config file. `.json` parses as JSON, anything else as YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// The defaults as YAML, for `config --example`.
    pub fn example_yaml() -> Result<String, EngineError> {
        Ok(serde_yaml::to_string(&EngineConfig::default())?)
    }
}
