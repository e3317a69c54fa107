//! Pipelines: ordered operation chains from a source frame to a target frame.

pub mod cache;
pub mod routes;
pub mod selector;

use std::fmt;
use std::sync::Arc;

use geodyn_core::models::DeformationModel;
use geodyn_core::types::{AccuracyClass, Ellipsoid, Epoch, FrameId};

use crate::conversion::ConversionStep;
use crate::datum_shift::{DatumShiftStep, ShiftKind};

/// Epoch a step is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepEpoch {
    /// Always this epoch.
    Fixed(Epoch),
    /// The request's source epoch, replaced by a coordinate's own time when
    /// it carries one.
    Source(Epoch),
}

impl StepEpoch {
    pub fn resolve(self, point_time: Option<Epoch>) -> Epoch {
        match self {
            Self::Fixed(e) => e,
            Self::Source(e) => point_time.unwrap_or(e),
        }
    }

    pub fn nominal(self) -> Epoch {
        match self {
            Self::Fixed(e) | Self::Source(e) => e,
        }
    }
}

impl fmt::Display for StepEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(e) => write!(f, "{e}"),
            Self::Source(e) => write!(f, "t({e})"),
        }
    }
}

/// Moves geographic positions through time within one frame.
#[derive(Debug, Clone)]
pub struct PropagationStep {
    pub frame: FrameId,
    pub ellipsoid: Ellipsoid,
    pub model: Arc<DeformationModel>,
    pub from: StepEpoch,
    pub to: Epoch,
}

impl PropagationStep {
    /// The request-level epochs coincide. Only a coordinate's own time can
    /// move it, so the step is kept for point-time bound starts.
    pub fn is_zero_interval(&self) -> bool {
        self.from.nominal() == self.to
    }

    pub fn accuracy(&self) -> AccuracyClass {
        if self.is_zero_interval() {
            AccuracyClass::Best
        } else {
            self.model.accuracy()
        }
    }

    /// Estimated displacement error over the nominal interval, in metres.
    pub fn error_estimate(&self) -> Option<f64> {
        if self.is_zero_interval() {
            return Some(0.0);
        }
        let dt = self.from.nominal().years_until(self.to).abs();
        self.model.velocity_uncertainty().map(|u| u * dt)
    }
}

#[derive(Debug, Clone)]
pub enum Step {
    /// Leaves coordinates unchanged. Carries the reason when it stands in
    /// for a step that could not be performed.
    Identity { reason: Option<String> },
    Projection(ConversionStep),
    DatumShift(DatumShiftStep),
    EpochPropagation(PropagationStep),
}

impl Step {
    pub fn accuracy(&self) -> AccuracyClass {
        match self {
            Self::Identity { .. } | Self::Projection(_) => AccuracyClass::Best,
            Self::DatumShift(s) => s.accuracy(),
            Self::EpochPropagation(p) => p.accuracy(),
        }
    }

    /// `None` when the error cannot be estimated (unavailable model).
    pub fn error_estimate(&self) -> Option<f64> {
        match self {
            Self::Identity { .. } | Self::Projection(_) => Some(0.0),
            Self::DatumShift(s) => Some(s.error_estimate()),
            Self::EpochPropagation(p) => p.error_estimate(),
        }
    }

    /// Leaves every coordinate unchanged, including same-realization shifts.
    pub fn is_identity(&self) -> bool {
        match self {
            Self::Identity { .. } => true,
            Self::DatumShift(s) => s.kind == ShiftKind::SameRealization,
            Self::Projection(_) | Self::EpochPropagation(_) => false,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity { reason: None } => write!(f, "noop"),
            Self::Identity { reason: Some(r) } => write!(f, "noop({r})"),
            Self::Projection(c) => write!(f, "{c}"),
            Self::DatumShift(s) => write!(f, "{s}"),
            Self::EpochPropagation(p) => write!(
                f,
                "propagate[{}:{}] {}->{}",
                p.frame,
                p.model.reference(),
                p.from,
                p.to
            ),
        }
    }
}

/// A selected, immutable operation chain plus its quality summary.
#[derive(Debug, Clone)]
pub struct Pipeline {
    source: FrameId,
    target: FrameId,
    steps: Vec<Step>,
    accuracy: AccuracyClass,
    error_estimate_m: Option<f64>,
    substituted_steps: usize,
}

impl Pipeline {
    pub fn identity(source: FrameId, target: FrameId) -> Self {
        Self {
            source,
            target,
            steps: vec![Step::Identity { reason: None }],
            accuracy: AccuracyClass::Best,
            error_estimate_m: Some(0.0),
            substituted_steps: 0,
        }
    }

    pub fn from_steps(source: FrameId, target: FrameId, steps: Vec<Step>) -> Self {
        let accuracy = AccuracyClass::worst_of(steps.iter().map(Step::accuracy));
        let error_estimate_m = steps
            .iter()
            .map(Step::error_estimate)
            .sum::<Option<f64>>();
        Self {
            source,
            target,
            steps,
            accuracy,
            error_estimate_m,
            substituted_steps: 0,
        }
    }

    /// Replace every propagation whose model is unavailable with an identity
    /// step. Zero-interval steps are kept so coordinates without their own
    /// time pass through unchanged and timed ones report as degraded. The
    /// recorded accuracy class is left as selected. Returns the number of
    /// replaced steps.
    pub(crate) fn substitute_unavailable(&mut self) -> usize {
        let mut replaced = 0;
        for step in &mut self.steps {
            if let Step::EpochPropagation(p) = step {
                if p.is_zero_interval() {
                    continue;
                }
                if let DeformationModel::Unavailable { reference, reason } = p.model.as_ref() {
                    *step = Step::Identity {
                        reason: Some(format!("{reference} unavailable: {reason}")),
                    };
                    replaced += 1;
                }
            }
        }
        self.substituted_steps += replaced;
        replaced
    }

    pub fn source(&self) -> &FrameId {
        &self.source
    }

    pub fn target(&self) -> &FrameId {
        &self.target
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Worst accuracy class over the selected steps.
    pub fn accuracy(&self) -> AccuracyClass {
        self.accuracy
    }

    pub fn error_estimate_m(&self) -> Option<f64> {
        self.error_estimate_m
    }

    pub fn substituted_steps(&self) -> usize {
        self.substituted_steps
    }

    /// Some propagation step still refers to an unavailable model.
    pub fn has_unavailable_model(&self) -> bool {
        self.steps.iter().any(|s| match s {
            Step::EpochPropagation(p) => !p.model.is_available(),
            _ => false,
        })
    }

    pub fn is_identity(&self) -> bool {
        self.steps.iter().all(Step::is_identity)
    }

    /// Human-readable operation chain, e.g. `inv geocentric(Grs80) | helmert[..]`.
    pub fn describe(&self) -> String {
        self.steps
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
