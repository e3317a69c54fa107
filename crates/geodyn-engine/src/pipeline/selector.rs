//! Pipeline selection: candidate enumeration, ranking, and the accuracy bar.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use geodyn_core::errors::{GeodynError, GeodynResult};
use geodyn_core::models::DeformationModel;
use geodyn_core::traits::{CrsProvider, DeformationResolver};
use geodyn_core::types::{
    CoordinateSystem, Ellipsoid, Epoch, EpochRequest, FrameDescriptor, ModelRef, ProjectionMethod,
};
use tracing::{debug, warn};

use super::routes::datum_routes;
use super::{Pipeline, PropagationStep, Step, StepEpoch};
use crate::conversion::{Conversion, ConversionStep};
use crate::datum_shift::{DatumShiftStep, ShiftKind};

/// Chooses the best operation chain for a request.
///
/// Stateless apart from its collaborators; concurrent `select` calls are
/// safe. Deformation models are resolved at most once per distinct
/// reference per call.
pub struct PipelineSelector {
    provider: Arc<dyn CrsProvider>,
    resolver: Arc<dyn DeformationResolver>,
    epoch_fallback: bool,
}

/// A propagation to schedule: start epoch and end epoch.
type Span = (StepEpoch, Epoch);

impl PipelineSelector {
    pub fn new(provider: Arc<dyn CrsProvider>, resolver: Arc<dyn DeformationResolver>) -> Self {
        Self {
            provider,
            resolver,
            epoch_fallback: false,
        }
    }

    /// Substitute a dynamic frame's reference epoch for a missing required
    /// epoch instead of failing.
    pub fn with_epoch_fallback(mut self, enabled: bool) -> Self {
        self.epoch_fallback = enabled;
        self
    }

    pub fn select(
        &self,
        source: &FrameDescriptor,
        target: &FrameDescriptor,
        epochs: EpochRequest,
        only_best: bool,
    ) -> GeodynResult<Pipeline> {
        if source.id == target.id && epochs.is_time_neutral() {
            debug!(frame = %source.id, "identical frame and epochs, identity pipeline");
            return Ok(Pipeline::identity(source.id.clone(), target.id.clone()));
        }

        let effective = self.effective_epochs(source, target, epochs)?;
        let mut models = HashMap::new();
        let mut candidates = self.candidates(source, target, effective, &mut models);
        if candidates.is_empty() {
            return Ok(Pipeline::identity(source.id.clone(), target.id.clone()));
        }
        candidates.sort_by(rank);

        let best_class = candidates[0].accuracy();
        debug!(
            source = %source.id,
            target = %target.id,
            candidates = candidates.len(),
            best = %best_class,
            "ranked candidate pipelines"
        );

        if only_best {
            return candidates
                .into_iter()
                .find(|c| c.accuracy().is_best())
                .ok_or_else(|| GeodynError::NoAccuratePipeline {
                    source_frame: source.id.to_string(),
                    target_frame: target.id.to_string(),
                    best: best_class,
                });
        }

        let Some(mut chosen) = candidates.into_iter().next() else {
            return Ok(Pipeline::identity(source.id.clone(), target.id.clone()));
        };
        let replaced = chosen.substitute_unavailable();
        if replaced > 0 {
            warn!(
                source = %source.id,
                target = %target.id,
                replaced,
                "deformation model unavailable, epoch propagation skipped"
            );
        }
        Ok(chosen)
    }

    /// The epochs the pipeline will actually use: `None` for static ends,
    /// always `Some` for dynamic ends.
    fn effective_epochs(
        &self,
        source: &FrameDescriptor,
        target: &FrameDescriptor,
        requested: EpochRequest,
    ) -> GeodynResult<EpochRequest> {
        if let Some(bad) = requested.first_non_finite() {
            return Err(GeodynError::IncompatibleEpochs {
                reason: format!("epoch {} is not a finite decimal year", bad.decimal_year()),
            });
        }
        let both_dynamic = source.is_dynamic() && target.is_dynamic();
        let fill = |frame: &FrameDescriptor,
                    supplied: Option<Epoch>,
                    side: &str|
         -> GeodynResult<Option<Epoch>> {
            let Some(reference) = frame.reference_epoch() else {
                return Ok(None);
            };
            match supplied {
                Some(e) => Ok(Some(e)),
                None if !both_dynamic || self.epoch_fallback => Ok(Some(reference)),
                None => Err(GeodynError::IncompatibleEpochs {
                    reason: format!(
                        "{side} epoch required: {} and {} are both dynamic",
                        source.id, target.id
                    ),
                }),
            }
        };
        Ok(EpochRequest::new(
            fill(source, requested.source, "source")?,
            fill(target, requested.target, "target")?,
        ))
    }

    fn candidates(
        &self,
        source: &FrameDescriptor,
        target: &FrameDescriptor,
        epochs: EpochRequest,
        models: &mut HashMap<ModelRef, Arc<DeformationModel>>,
    ) -> Vec<Pipeline> {
        if source.id == target.id {
            // Equal request epochs were short-circuited already; a zero
            // interval here only arises from a filled-in reference epoch.
            return match (epochs.source, epochs.target) {
                (Some(es), Some(et)) => {
                    let span = (StepEpoch::Source(es), et);
                    vec![self.chain(source, target, None, None, Some(span), None, models)]
                }
                _ => Vec::new(),
            };
        }

        let mut out = Vec::new();
        for route in datum_routes(self.provider.as_ref(), &source.datum, &target.datum) {
            let route = Some(route.as_slice());
            match (source.reference_epoch(), target.reference_epoch()) {
                (Some(_), Some(_)) => {
                    let (Some(es), Some(et)) = (epochs.source, epochs.target) else {
                        continue;
                    };
                    // Propagate in the source frame, then shift at the target epoch.
                    // Emitted at a zero interval too, for coordinate times.
                    out.push(self.chain(
                        source,
                        target,
                        route,
                        Some(StepEpoch::Fixed(et)),
                        Some((StepEpoch::Source(es), et)),
                        None,
                        models,
                    ));
                    if es != et {
                        // Shift at the source epoch, then propagate in the target frame.
                        out.push(self.chain(
                            source,
                            target,
                            route,
                            Some(StepEpoch::Source(es)),
                            None,
                            Some((StepEpoch::Source(es), et)),
                            models,
                        ));
                    }
                }
                (Some(source_ref), None) => {
                    let es = epochs.source.unwrap_or(source_ref);
                    out.push(self.chain(
                        source,
                        target,
                        route,
                        Some(StepEpoch::Fixed(source_ref)),
                        Some((StepEpoch::Source(es), source_ref)),
                        None,
                        models,
                    ));
                }
                (None, Some(target_ref)) => {
                    let et = epochs.target.unwrap_or(target_ref);
                    let after = (et != target_ref).then_some((StepEpoch::Fixed(target_ref), et));
                    out.push(self.chain(
                        source,
                        target,
                        route,
                        Some(StepEpoch::Fixed(target_ref)),
                        None,
                        after,
                        models,
                    ));
                }
                (None, None) => {
                    out.push(self.chain(source, target, route, None, None, None, models));
                }
            }
        }
        out
    }

    /// Assemble one candidate: optional propagation in the source frame,
    /// the datum route evaluated at `shift_epoch`, optional propagation in
    /// the target frame, with conversions in between.
    #[allow(clippy::too_many_arguments)]
    fn chain(
        &self,
        source: &FrameDescriptor,
        target: &FrameDescriptor,
        route: Option<&[DatumShiftStep]>,
        shift_epoch: Option<StepEpoch>,
        before: Option<Span>,
        after: Option<Span>,
        models: &mut HashMap<ModelRef, Arc<DeformationModel>>,
    ) -> Pipeline {
        let mut chain = ChainBuilder::new(source.coordinate_system, source.ellipsoid);

        if let Some((from, to)) = before {
            chain.propagate(self.propagation(source, from, to, models));
        }

        let route = route.unwrap_or(&[]);
        let null_route = route.iter().all(|leg| leg.kind == ShiftKind::SameRealization)
            && source.ellipsoid == target.ellipsoid;
        if !null_route {
            chain.to_geocentric();
        }
        for leg in route {
            let leg = match shift_epoch {
                Some(epoch) => leg.clone().at(epoch),
                None => leg.clone(),
            };
            chain.steps.push(Step::DatumShift(leg));
        }
        chain.ellipsoid = target.ellipsoid;

        if let Some((from, to)) = after {
            chain.propagate(self.propagation(target, from, to, models));
        }

        let steps = chain.finish(target.coordinate_system);
        if steps.is_empty() {
            Pipeline::identity(source.id.clone(), target.id.clone())
        } else {
            Pipeline::from_steps(source.id.clone(), target.id.clone(), steps)
        }
    }

    fn propagation(
        &self,
        frame: &FrameDescriptor,
        from: StepEpoch,
        to: Epoch,
        models: &mut HashMap<ModelRef, Arc<DeformationModel>>,
    ) -> PropagationStep {
        let model = match frame.deformation_model() {
            Some(reference) => models
                .entry(reference.clone())
                .or_insert_with(|| self.resolver.resolve(reference))
                .clone(),
            None => Arc::new(DeformationModel::unavailable(
                ModelRef::from(format!("{}:velocity", frame.id)),
                "frame declares no deformation model",
            )),
        };
        PropagationStep {
            frame: frame.id.clone(),
            ellipsoid: frame.ellipsoid,
            model,
            from,
            to,
        }
    }
}

/// Worst class first (higher is better), then fewer steps, then smaller
/// summed error when both sides can be estimated.
fn rank(a: &Pipeline, b: &Pipeline) -> Ordering {
    b.accuracy()
        .cmp(&a.accuracy())
        .then_with(|| a.steps().len().cmp(&b.steps().len()))
        .then_with(|| match (a.error_estimate_m(), b.error_estimate_m()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        })
}

/// Representation the coordinates are in at the current point of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repr {
    Geographic,
    Geocentric,
    Projected(ProjectionMethod),
}

struct ChainBuilder {
    steps: Vec<Step>,
    repr: Repr,
    ellipsoid: Ellipsoid,
    source_2d: bool,
    lifted: bool,
}

impl ChainBuilder {
    fn new(cs: CoordinateSystem, ellipsoid: Ellipsoid) -> Self {
        let repr = match cs {
            CoordinateSystem::Geographic2d | CoordinateSystem::Geographic3d => Repr::Geographic,
            CoordinateSystem::Geocentric => Repr::Geocentric,
            CoordinateSystem::Projected(m) => Repr::Projected(m),
        };
        Self {
            steps: Vec::new(),
            repr,
            ellipsoid,
            source_2d: matches!(cs, CoordinateSystem::Geographic2d | CoordinateSystem::Projected(_)),
            lifted: false,
        }
    }

    fn to_geographic(&mut self) {
        match self.repr {
            Repr::Geographic => {}
            Repr::Geocentric => {
                self.convert(ConversionStep::inverse(Conversion::Geocentric(self.ellipsoid)))
            }
            Repr::Projected(m) => {
                self.convert(ConversionStep::inverse(Conversion::Projection(m, self.ellipsoid)))
            }
        }
        self.repr = Repr::Geographic;
    }

    fn to_geocentric(&mut self) {
        if self.repr == Repr::Geocentric {
            return;
        }
        self.to_geographic();
        self.convert(ConversionStep::forward(Conversion::Geocentric(self.ellipsoid)));
        self.repr = Repr::Geocentric;
        self.lifted = true;
    }

    fn propagate(&mut self, step: PropagationStep) {
        self.to_geographic();
        self.steps.push(Step::EpochPropagation(step));
    }

    fn convert(&mut self, step: ConversionStep) {
        self.steps.push(Step::Projection(step));
    }

    fn finish(mut self, cs: CoordinateSystem) -> Vec<Step> {
        match cs {
            CoordinateSystem::Geocentric => self.to_geocentric(),
            CoordinateSystem::Geographic3d => {
                self.to_geographic();
                if self.source_2d && !self.lifted {
                    self.convert(ConversionStep::inverse(Conversion::Geographic2d));
                }
            }
            CoordinateSystem::Geographic2d => {
                self.to_geographic();
                if !self.source_2d || self.lifted {
                    self.convert(ConversionStep::forward(Conversion::Geographic2d));
                }
            }
            CoordinateSystem::Projected(m) => {
                self.to_geographic();
                self.convert(ConversionStep::forward(Conversion::Projection(m, self.ellipsoid)));
            }
        }
        self.steps
    }
}
