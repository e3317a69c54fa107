pub mod grid_config;
pub mod transform_config;

use serde::{Deserialize, Serialize};

pub use grid_config::GridConfig;
pub use transform_config::TransformConfig;

use crate::errors::GeodynResult;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeodynConfig {
    pub transform: TransformConfig,
    pub grid: GridConfig,
}

impl GeodynConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> GeodynResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load config from a TOML file on disk.
    pub fn from_file(path: &std::path::Path) -> GeodynResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
