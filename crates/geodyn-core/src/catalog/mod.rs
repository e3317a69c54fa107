//! In-memory CRS catalog: frame descriptors plus the Helmert
//! transformations known between their datums.

mod builtin;
mod records;

use rustc_hash::FxHashMap;
use tracing::debug;

pub use records::{CatalogFile, FrameRecord};

use crate::errors::{GeodynError, GeodynResult};
use crate::models::HelmertTransform;
use crate::traits::CrsProvider;
use crate::types::{FrameDescriptor, FrameId};

/// A `CrsProvider` backed by in-memory maps. Read-only once shared.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    frames: FxHashMap<FrameId, FrameDescriptor>,
    datum_shifts: Vec<HelmertTransform>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the built-in frames and transformations.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for frame in builtin::frames() {
            catalog.frames.insert(frame.id.clone(), frame);
        }
        catalog.datum_shifts = builtin::datum_shifts();
        catalog
    }

    /// Parse a TOML catalog (`[[frames]]` and `[[datum_shifts]]` tables).
    pub fn from_toml(toml_str: &str) -> GeodynResult<Self> {
        let file: CatalogFile = toml::from_str(toml_str)?;
        let mut catalog = Self::new();
        catalog.extend_from(file)?;
        Ok(catalog)
    }

    /// Merge records from a parsed catalog file, validating each frame.
    pub fn extend_from(&mut self, file: CatalogFile) -> GeodynResult<()> {
        for record in file.frames {
            let frame = FrameDescriptor::try_from(record)?;
            self.insert_frame(frame)?;
        }
        for shift in file.datum_shifts {
            self.add_datum_shift(shift);
        }
        Ok(())
    }

    /// Add a frame; a second frame with the same id is rejected.
    pub fn insert_frame(&mut self, frame: FrameDescriptor) -> GeodynResult<()> {
        if self.frames.contains_key(&frame.id) {
            return Err(GeodynError::InvalidFrame {
                id: frame.id.to_string(),
                reason: "duplicate frame identifier".to_string(),
            });
        }
        debug!(frame = %frame.id, dynamic = frame.is_dynamic(), "catalog frame added");
        self.frames.insert(frame.id.clone(), frame);
        Ok(())
    }

    pub fn with_frame(mut self, frame: FrameDescriptor) -> GeodynResult<Self> {
        self.insert_frame(frame)?;
        Ok(self)
    }

    pub fn add_datum_shift(&mut self, shift: HelmertTransform) {
        self.datum_shifts.push(shift);
    }

    pub fn with_datum_shift(mut self, shift: HelmertTransform) -> Self {
        self.add_datum_shift(shift);
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame_ids(&self) -> impl Iterator<Item = &FrameId> {
        self.frames.keys()
    }
}

impl CrsProvider for InMemoryCatalog {
    fn frame(&self, id: &FrameId) -> GeodynResult<FrameDescriptor> {
        self.frames
            .get(id)
            .cloned()
            .ok_or_else(|| GeodynError::UnknownFrame { id: id.to_string() })
    }

    fn datum_shifts_involving(&self, datum: &FrameId) -> Vec<HelmertTransform> {
        self.datum_shifts
            .iter()
            .filter(|t| t.involves(datum))
            .cloned()
            .collect()
    }
}
