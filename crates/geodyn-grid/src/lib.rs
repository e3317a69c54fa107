//! # geodyn-grid
//!
//! The Grid Resolver: turns deformation-model references into usable
//! velocity grids or analytical plate models, tags each with an accuracy
//! class, and shares the results through a process-wide concurrent cache.
//!
//! Resolution order: cached result, local grid file, built-in plate model,
//! otherwise an unavailable model (never an error).

pub mod format;
pub mod persistence;
pub mod plate_models;
pub mod resolver;
pub mod storage;

pub use persistence::{CacheIndex, CacheRecord};
pub use resolver::{GridResolver, ResolverStats};
pub use storage::DirectoryGridStorage;
