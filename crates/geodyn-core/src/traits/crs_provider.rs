//! `CrsProvider`: the CRS description provider.
//!
//! Supplies already-parsed frame descriptors and the datum transformations
//! known between them. Parsing of CRS definition text happens upstream.

use crate::errors::GeodynResult;
use crate::models::HelmertTransform;
use crate::types::{FrameDescriptor, FrameId};

pub trait CrsProvider: Send + Sync {
    /// Pure lookup. Fails with `UnknownFrame` when `id` is not known.
    fn frame(&self, id: &FrameId) -> GeodynResult<FrameDescriptor>;

    /// Every catalogued transformation with `datum` at either end.
    fn datum_shifts_involving(&self, datum: &FrameId) -> Vec<HelmertTransform>;
}
