//! # geodyn-core
//!
//! Foundation crate for the geodyn epoch-aware transformation engine.
//! Defines frames, epochs, coordinates, deformation models, Helmert
//! parameter sets, provider traits, errors, config, logging setup, and the
//! built-in CRS catalog. Every other crate in the workspace depends on this.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use catalog::InMemoryCatalog;
pub use config::GeodynConfig;
pub use errors::{GeodynError, GeodynErrorCode, GeodynResult, GridError};
pub use models::{DeformationModel, HelmertTransform, ModelDefinition};
pub use traits::{CrsProvider, DeformationResolver, GridStorage};
pub use types::{
    AccuracyClass, Coordinate, CoordinateSystem, Ellipsoid, Epoch, FrameDescriptor, FrameId,
    FrameKind, ModelRef,
};
