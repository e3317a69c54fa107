//! Grid Resolver configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::ModelDefinition;

/// Configuration for locating and resolving deformation models.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GridConfig {
    /// Local directories searched in order for grid files.
    pub search_paths: Vec<PathBuf>,
    /// Try the analytical plate model before the grid. Default: false.
    pub prefer_analytical: Option<bool>,
    /// Where the resolver cache index is persisted, if anywhere.
    pub cache_index_path: Option<PathBuf>,
    /// Declared deformation models, in addition to the built-in ones.
    pub models: Vec<ModelDefinition>,
}

impl GridConfig {
    /// Returns whether analytical models are preferred, defaulting to false.
    pub fn effective_prefer_analytical(&self) -> bool {
        self.prefer_analytical.unwrap_or(false)
    }
}
