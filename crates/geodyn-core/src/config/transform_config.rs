//! Pipeline selection and execution configuration.

use serde::{Deserialize, Serialize};

/// Configuration for building and running transformers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Reject pipelines whose worst accuracy class is not BEST.
    pub only_best: bool,
    /// Use a dynamic frame's reference epoch when a required epoch is missing.
    pub epoch_fallback_to_reference: bool,
    /// Maximum number of cached pipelines.
    pub pipeline_cache_capacity: u64,
    /// Batches at least this large execute on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            only_best: false,
            epoch_fallback_to_reference: false,
            pipeline_cache_capacity: 1024,
            parallel_threshold: 4096,
        }
    }
}
