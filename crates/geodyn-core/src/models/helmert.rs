//! Time-dependent (14-parameter) Helmert transformations between datums.

use serde::{Deserialize, Serialize};

use crate::types::{Epoch, FrameId};

/// Seven Helmert parameters: translations in metres, rotations in
/// milliarcseconds, scale in parts per billion. Also used for yearly rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelmertParams {
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    pub scale: f64,
}

impl HelmertParams {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    fn add_scaled(&self, rate: &HelmertParams, dt: f64) -> HelmertParams {
        HelmertParams {
            tx: self.tx + rate.tx * dt,
            ty: self.ty + rate.ty * dt,
            tz: self.tz + rate.tz * dt,
            rx: self.rx + rate.rx * dt,
            ry: self.ry + rate.ry * dt,
            rz: self.rz + rate.rz * dt,
            scale: self.scale + rate.scale * dt,
        }
    }
}

/// Sign convention of the rotation parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationConvention {
    /// IERS convention (EPSG:1033 / 1053).
    #[default]
    PositionVector,
    /// Rotations of the axes rather than the point (EPSG:1032 / 1056).
    CoordinateFrame,
}

/// A published transformation from one datum to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelmertTransform {
    pub source: FrameId,
    pub target: FrameId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub params: HelmertParams,
    #[serde(default)]
    pub rates: HelmertParams,
    /// Epoch at which `params` apply; rates are ignored when absent.
    #[serde(default)]
    pub reference_epoch: Option<Epoch>,
    #[serde(default)]
    pub convention: RotationConvention,
    /// Published accuracy in metres.
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

impl HelmertTransform {
    pub fn new(source: impl Into<FrameId>, target: impl Into<FrameId>, params: HelmertParams) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            name: format!("{source} to {target}"),
            source,
            target,
            params,
            rates: HelmertParams::default(),
            reference_epoch: None,
            convention: RotationConvention::PositionVector,
            accuracy_m: None,
        }
    }

    /// The zero transformation from a datum to another with no known offset.
    pub fn null(source: impl Into<FrameId>, target: impl Into<FrameId>) -> Self {
        Self::new(source, target, HelmertParams::default())
    }

    pub fn with_rates(mut self, rates: HelmertParams, reference_epoch: Epoch) -> Self {
        self.rates = rates;
        self.reference_epoch = Some(reference_epoch);
        self
    }

    pub fn with_convention(mut self, convention: RotationConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether `datum` is either end of the transformation.
    pub fn involves(&self, datum: &FrameId) -> bool {
        &self.source == datum || &self.target == datum
    }

    /// The far end when starting from `datum`.
    pub fn other_end(&self, datum: &FrameId) -> Option<&FrameId> {
        if &self.source == datum {
            Some(&self.target)
        } else if &self.target == datum {
            Some(&self.source)
        } else {
            None
        }
    }

    /// Parameters evaluated at `epoch`, in position-vector convention.
    pub fn params_at(&self, epoch: Option<Epoch>) -> HelmertParams {
        let p = match (self.reference_epoch, epoch) {
            (Some(t0), Some(t)) => self.params.add_scaled(&self.rates, t0.years_until(t)),
            _ => self.params,
        };
        match self.convention {
            RotationConvention::PositionVector => p,
            RotationConvention::CoordinateFrame => HelmertParams {
                rx: -p.rx,
                ry: -p.ry,
                rz: -p.rz,
                ..p
            },
        }
    }

    pub fn is_time_dependent(&self) -> bool {
        self.reference_epoch.is_some() && !self.rates.is_zero()
    }
}
