//! Pipeline cache: Moka in-memory, keyed by frames, epochs, and accuracy bar.
//! Only pipelines whose accuracy class is BEST are admitted, so a later
//! `refresh` after grids become available can pick up better chains.

use std::sync::Arc;

use geodyn_core::types::{EpochRequest, FrameId};
use moka::sync::Cache;

use super::Pipeline;

/// Epochs are keyed by bit pattern so `NaN` never reaches the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    source: FrameId,
    target: FrameId,
    source_epoch: Option<u64>,
    target_epoch: Option<u64>,
    only_best: bool,
}

impl PipelineKey {
    pub fn new(source: &FrameId, target: &FrameId, epochs: EpochRequest, only_best: bool) -> Self {
        Self {
            source: source.clone(),
            target: target.clone(),
            source_epoch: epochs.source.map(|e| e.key_bits()),
            target_epoch: epochs.target.map(|e| e.key_bits()),
            only_best,
        }
    }
}

pub struct PipelineCache {
    inner: Cache<PipelineKey, Arc<Pipeline>>,
}

impl PipelineCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn get(&self, key: &PipelineKey) -> Option<Arc<Pipeline>> {
        self.inner.get(key)
    }

    /// Admit `pipeline` if it is BEST and every model it carries resolved.
    /// Returns whether it was stored.
    pub fn admit(&self, key: PipelineKey, pipeline: Arc<Pipeline>) -> bool {
        if !pipeline.accuracy().is_best()
            || pipeline.substituted_steps() > 0
            || pipeline.has_unavailable_model()
        {
            return false;
        }
        self.inner.insert(key, pipeline);
        true
    }

    /// Drop every cached pipeline.
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    /// Number of cached pipelines after pending maintenance has run.
    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PipelineCache {
    fn default() -> Self {
        Self::new(1024)
    }
}
