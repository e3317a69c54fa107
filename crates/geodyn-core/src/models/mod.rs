//! Deformation models, Helmert parameter sets, and model definitions.

pub mod deformation;
pub mod helmert;
pub mod model_definition;

pub use deformation::{DeformationModel, EnuVelocity, EulerPole, VelocityGrid, MAS_TO_RAD};
pub use helmert::{HelmertParams, HelmertTransform, RotationConvention};
pub use model_definition::ModelDefinition;
