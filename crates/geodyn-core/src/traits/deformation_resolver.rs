//! `DeformationResolver`: the Grid Resolver as seen by the pipeline selector.

use std::sync::Arc;

use crate::models::DeformationModel;
use crate::types::ModelRef;

/// Resolves a deformation-model reference to a usable model.
///
/// Never fails: a model that cannot be found comes back as
/// `DeformationModel::Unavailable` and the caller decides whether that is
/// acceptable. Implementations must be safe to share across threads.
pub trait DeformationResolver: Send + Sync {
    fn resolve(&self, reference: &ModelRef) -> Arc<DeformationModel>;
}
