//! Caller-facing API: look up frames, build transformers, run batches.

use std::path::PathBuf;
use std::sync::Arc;

use geodyn_core::config::{GeodynConfig, TransformConfig};
use geodyn_core::errors::GeodynResult;
use geodyn_core::traits::{CrsProvider, DeformationResolver};
use geodyn_core::types::{AccuracyClass, Coordinate, Epoch, EpochRequest, FrameDescriptor, FrameId};
use geodyn_grid::GridResolver;
use serde::Serialize;
use tracing::{debug, info};

use crate::executor::TransformExecutor;
use crate::pipeline::cache::{PipelineCache, PipelineKey};
use crate::pipeline::selector::PipelineSelector;
use crate::pipeline::Pipeline;

/// Source and target frames, their epochs, and the accuracy bar.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest {
    pub source: FrameId,
    pub target: FrameId,
    pub epochs: EpochRequest,
    /// Overrides `TransformConfig::only_best` when set.
    pub only_best: Option<bool>,
}

impl TransformRequest {
    pub fn new(source: impl Into<FrameId>, target: impl Into<FrameId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            epochs: EpochRequest::default(),
            only_best: None,
        }
    }

    pub fn source_epoch(mut self, year: f64) -> Self {
        self.epochs.source = Some(Epoch::from_decimal_year(year));
        self
    }

    pub fn target_epoch(mut self, year: f64) -> Self {
        self.epochs.target = Some(Epoch::from_decimal_year(year));
        self
    }

    pub fn only_best(mut self, only_best: bool) -> Self {
        self.only_best = Some(only_best);
        self
    }
}

/// Describes the operation applied to a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationMetadata {
    pub source: FrameId,
    pub target: FrameId,
    pub description: String,
    pub accuracy: AccuracyClass,
    /// Estimated error in metres; `None` when it cannot be estimated.
    pub error_estimate_m: Option<f64>,
    pub step_count: usize,
    /// Propagations replaced by identity because their model was unavailable.
    pub substituted_steps: usize,
    /// Coordinates that failed a step and kept their pre-step values.
    pub degraded_points: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub coordinates: Vec<Coordinate>,
    pub metadata: OperationMetadata,
}

/// A built transformer: an immutable pipeline ready to run on batches.
/// Cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct TransformerHandle {
    request: TransformRequest,
    pipeline: Arc<Pipeline>,
    executor: TransformExecutor,
}

impl TransformerHandle {
    pub fn request(&self) -> &TransformRequest {
        &self.request
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Transform a batch. Never fails; the output has the input's length
    /// and order, and an empty batch gives an empty output.
    pub fn transform(&self, batch: &[Coordinate]) -> TransformOutput {
        let report = self.executor.execute(&self.pipeline, batch);
        if report.degraded_points > 0 {
            debug!(
                source = %self.request.source,
                target = %self.request.target,
                degraded = report.degraded_points,
                "some coordinates kept pre-step values"
            );
        }
        TransformOutput {
            coordinates: report.coordinates,
            metadata: OperationMetadata {
                source: self.pipeline.source().clone(),
                target: self.pipeline.target().clone(),
                description: self.pipeline.describe(),
                accuracy: self.pipeline.accuracy(),
                error_estimate_m: self.pipeline.error_estimate_m(),
                step_count: self.pipeline.steps().len(),
                substituted_steps: self.pipeline.substituted_steps(),
                degraded_points: report.degraded_points,
            },
        }
    }
}

/// The transformation engine. Holds the CRS provider, the Grid Resolver,
/// and a cache of selected pipelines.
pub struct Transformer {
    provider: Arc<dyn CrsProvider>,
    selector: PipelineSelector,
    config: TransformConfig,
    pipelines: PipelineCache,
    grid_resolver: Option<Arc<GridResolver>>,
    index_path: Option<PathBuf>,
}

impl Transformer {
    pub fn new(
        provider: Arc<dyn CrsProvider>,
        resolver: Arc<dyn DeformationResolver>,
        config: TransformConfig,
    ) -> Self {
        let selector = PipelineSelector::new(provider.clone(), resolver)
            .with_epoch_fallback(config.epoch_fallback_to_reference);
        Self {
            provider,
            selector,
            pipelines: PipelineCache::new(config.pipeline_cache_capacity),
            config,
            grid_resolver: None,
            index_path: None,
        }
    }

    /// Engine backed by a `GridResolver` built from `config.grid`. When a
    /// cache index path is configured the resolver is warmed from it.
    pub fn from_config(provider: Arc<dyn CrsProvider>, config: &GeodynConfig) -> GeodynResult<Self> {
        let resolver = Arc::new(GridResolver::from_config(&config.grid));
        if let Some(path) = &config.grid.cache_index_path {
            let warmed = resolver.warm_from_index(path)?;
            info!(warmed, "deformation models restored from index");
        }
        let mut engine = Self::new(provider, resolver.clone(), config.transform.clone());
        engine.grid_resolver = Some(resolver);
        engine.index_path = config.grid.cache_index_path.clone();
        Ok(engine)
    }

    /// Frame lookup. Fails with `UnknownFrame`.
    pub fn frame(&self, id: &FrameId) -> GeodynResult<FrameDescriptor> {
        self.provider.frame(id)
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Select a pipeline for `request`. Unknown frames, incompatible epochs,
    /// and unmet accuracy bars are reported here, never during `transform`.
    pub fn build_transformer(&self, request: &TransformRequest) -> GeodynResult<TransformerHandle> {
        let only_best = request.only_best.unwrap_or(self.config.only_best);
        let key = PipelineKey::new(&request.source, &request.target, request.epochs, only_best);

        let pipeline = match self.pipelines.get(&key) {
            Some(hit) => hit,
            None => {
                let source = self.provider.frame(&request.source)?;
                let target = self.provider.frame(&request.target)?;
                let pipeline = Arc::new(self.selector.select(&source, &target, request.epochs, only_best)?);
                debug!(
                    source = %request.source,
                    target = %request.target,
                    accuracy = %pipeline.accuracy(),
                    steps = %pipeline.describe(),
                    "pipeline selected"
                );
                self.pipelines.admit(key, pipeline.clone());
                pipeline
            }
        };

        Ok(TransformerHandle {
            request: request.clone(),
            pipeline,
            executor: TransformExecutor::new(self.config.parallel_threshold),
        })
    }

    /// Build and run in one call.
    pub fn transform(&self, request: &TransformRequest, batch: &[Coordinate]) -> GeodynResult<TransformOutput> {
        Ok(self.build_transformer(request)?.transform(batch))
    }

    /// Forget cached pipelines so the next build re-selects, e.g. after
    /// grids have been acquired.
    pub fn refresh(&self) {
        self.pipelines.clear();
        debug!("pipeline cache cleared");
    }

    pub fn cached_pipelines(&self) -> u64 {
        self.pipelines.len()
    }

    /// Persist the resolver's cache index when the engine was built with
    /// `from_config` and an index path. Returns whether an index was written.
    pub fn persist_index(&self) -> GeodynResult<bool> {
        match (&self.grid_resolver, &self.index_path) {
            (Some(resolver), Some(path)) => {
                resolver.save_index(path)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
