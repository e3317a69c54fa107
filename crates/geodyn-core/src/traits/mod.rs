//! Seams to external collaborators and injectable services.

mod crs_provider;
mod deformation_resolver;
mod grid_storage;

pub use crs_provider::CrsProvider;
pub use deformation_resolver::DeformationResolver;
pub use grid_storage::GridStorage;
