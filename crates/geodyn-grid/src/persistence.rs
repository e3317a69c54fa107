//! Persisted resolver cache index.
//!
//! The index only records what resolved and how; warming re-runs resolution
//! for every listed reference, so a stale or missing index never affects
//! correctness.

use std::path::Path;

use geodyn_core::errors::GeodynResult;
use geodyn_core::types::{AccuracyClass, ModelRef};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::resolver::GridResolver;

const INDEX_VERSION: u32 = 1;

/// One cached resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub reference: ModelRef,
    /// Grid path or `plate:<ID>`.
    pub source: String,
    pub accuracy: AccuracyClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheIndex {
    pub version: u32,
    pub entries: Vec<CacheRecord>,
}

impl Default for CacheIndex {
    fn default() -> Self {
        Self {
            version: INDEX_VERSION,
            entries: Vec::new(),
        }
    }
}

impl GridResolver {
    /// Snapshot of the current cache, sorted by reference.
    pub fn snapshot_index(&self) -> CacheIndex {
        let mut entries: Vec<CacheRecord> = self
            .cached_models()
            .iter()
            .map(|m| CacheRecord {
                reference: m.reference().clone(),
                source: m.source_label(),
                accuracy: m.accuracy(),
            })
            .collect();
        entries.sort_by(|a, b| a.reference.cmp(&b.reference));
        CacheIndex {
            version: INDEX_VERSION,
            entries,
        }
    }

    /// Write the index as JSON, replacing any previous file atomically.
    pub fn save_index(&self, path: &Path) -> GeodynResult<()> {
        let index = self.snapshot_index();
        let json = serde_json::to_string_pretty(&index)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        debug!(path = %path.display(), entries = index.entries.len(), "saved resolver index");
        Ok(())
    }

    /// Re-resolve every reference in a saved index. Returns how many are
    /// available now. A missing file warms nothing.
    pub fn warm_from_index(&self, path: &Path) -> GeodynResult<usize> {
        if !path.exists() {
            return Ok(0);
        }
        let text = std::fs::read_to_string(path)?;
        let index: CacheIndex = serde_json::from_str(&text)?;
        let available = index
            .entries
            .iter()
            .filter(|record| self.resolve_model(&record.reference).is_available())
            .count();
        info!(
            path = %path.display(),
            listed = index.entries.len(),
            available,
            "warmed resolver from index"
        );
        Ok(available)
    }
}
