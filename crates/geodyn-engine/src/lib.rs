//! # geodyn-engine
//!
//! Epoch-aware transformation pipeline engine.
//!
//! A request (source frame + epoch, target frame + epoch) is turned into a
//! ranked set of candidate operation chains by the [`PipelineSelector`],
//! which consults the CRS provider and the Grid Resolver. The chosen
//! [`Pipeline`] is run over coordinate batches by the [`TransformExecutor`];
//! the [`EpochPropagator`] moves positions through time inside it.
//! [`Transformer`] is the caller-facing API tying these together.

pub mod conversion;
pub mod datum_shift;
pub mod executor;
pub mod pipeline;
pub mod propagator;
pub mod transformer;

pub use executor::{ExecutionReport, TransformExecutor};
pub use pipeline::selector::PipelineSelector;
pub use pipeline::{Pipeline, Step, StepEpoch};
pub use propagator::{EpochPropagator, PropagationStatus};
pub use transformer::{
    OperationMetadata, TransformOutput, TransformRequest, Transformer, TransformerHandle,
};
