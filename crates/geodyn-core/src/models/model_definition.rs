//! Declared deformation models: which grid file and/or plate rotation a
//! model reference maps to.

use serde::{Deserialize, Serialize};

use crate::types::ModelRef;

/// How a `ModelRef` is resolved.
///
/// - grid + plate: the grid is authoritative; the plate is a degraded stand-in.
/// - plate only: the plate model is authoritative.
/// - grid only: the grid or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub reference: ModelRef,
    /// Grid file name looked up through the grid storage provider.
    #[serde(default)]
    pub grid: Option<String>,
    /// Built-in plate identifier, e.g. `ITRF2014-PMM:NOAM`.
    #[serde(default)]
    pub plate: Option<String>,
}

impl ModelDefinition {
    pub fn grid(reference: impl Into<ModelRef>, file: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            grid: Some(file.into()),
            plate: None,
        }
    }

    pub fn plate(reference: impl Into<ModelRef>, plate: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            grid: None,
            plate: Some(plate.into()),
        }
    }

    pub fn with_plate_fallback(mut self, plate: impl Into<String>) -> Self {
        self.plate = Some(plate.into());
        self
    }

    /// Plate model is the authoritative source (no grid declared).
    pub fn plate_is_authoritative(&self) -> bool {
        self.grid.is_none() && self.plate.is_some()
    }
}
