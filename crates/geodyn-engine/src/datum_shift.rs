//! Helmert datum shifts on geocentric coordinates.

use std::fmt;

use geodyn_core::models::{HelmertParams, HelmertTransform, MAS_TO_RAD};
use geodyn_core::types::{AccuracyClass, Epoch, FrameId};

use crate::pipeline::StepEpoch;

/// Error assumed for a published transformation that states no accuracy.
pub const UNSTATED_ACCURACY_M: f64 = 0.1;

/// Error assumed for a ballpark (null) shift between unrelated datums.
pub const BALLPARK_ACCURACY_M: f64 = 2.0;

/// How a datum shift came to be part of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    /// A catalogued transformation.
    Published,
    /// Source and target share a datum realization; the shift is the identity.
    SameRealization,
    /// No catalogued transformation connects the datums.
    Ballpark,
}

/// One oriented Helmert application inside a pipeline.
#[derive(Debug, Clone)]
pub struct DatumShiftStep {
    pub transform: HelmertTransform,
    /// Apply the inverse of `transform` (target -> source).
    pub inverse: bool,
    pub kind: ShiftKind,
    /// Epoch the time-dependent parameters are evaluated at.
    pub epoch: Option<StepEpoch>,
}

impl DatumShiftStep {
    /// Orient `transform` so that it starts at `from`.
    pub fn oriented(transform: HelmertTransform, from: &FrameId, kind: ShiftKind) -> Self {
        let inverse = transform.source != *from;
        Self {
            transform,
            inverse,
            kind,
            epoch: None,
        }
    }

    pub fn ballpark(from: &FrameId, to: &FrameId) -> Self {
        Self::oriented(
            HelmertTransform::null(from.clone(), to.clone()).with_name("ballpark"),
            from,
            ShiftKind::Ballpark,
        )
    }

    pub fn same_realization(datum: &FrameId) -> Self {
        Self::oriented(
            HelmertTransform::null(datum.clone(), datum.clone()).with_name("same realization"),
            datum,
            ShiftKind::SameRealization,
        )
    }

    pub fn at(mut self, epoch: StepEpoch) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// Datum this step lands in.
    pub fn to_datum(&self) -> &FrameId {
        if self.inverse {
            &self.transform.source
        } else {
            &self.transform.target
        }
    }

    pub fn accuracy(&self) -> AccuracyClass {
        match self.kind {
            ShiftKind::Published | ShiftKind::SameRealization => AccuracyClass::Best,
            ShiftKind::Ballpark => AccuracyClass::Degraded,
        }
    }

    pub fn error_estimate(&self) -> f64 {
        match self.kind {
            ShiftKind::SameRealization => 0.0,
            ShiftKind::Ballpark => BALLPARK_ACCURACY_M,
            ShiftKind::Published => self.transform.accuracy_m.unwrap_or(UNSTATED_ACCURACY_M),
        }
    }

    /// Shift a geocentric position. `point_time` overrides a source-bound epoch.
    pub fn apply(&self, xyz: [f64; 3], point_time: Option<Epoch>) -> [f64; 3] {
        let epoch = self.epoch.map(|e| e.resolve(point_time));
        let params = self.transform.params_at(epoch);
        if self.inverse {
            helmert_inverse(&params, xyz)
        } else {
            helmert_forward(&params, xyz)
        }
    }
}

impl fmt::Display for DatumShiftStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = if self.inverse { "inv " } else { "" };
        write!(f, "{dir}helmert[{}]", self.transform.name)?;
        if let Some(epoch) = self.epoch {
            if self.transform.is_time_dependent() {
                write!(f, "@{epoch}")?;
            }
        }
        Ok(())
    }
}

type Mat3 = [[f64; 3]; 3];

/// Small-angle rotation matrix, position-vector convention.
fn rotation(p: &HelmertParams) -> Mat3 {
    let (rx, ry, rz) = (p.rx * MAS_TO_RAD, p.ry * MAS_TO_RAD, p.rz * MAS_TO_RAD);
    [[1.0, -rz, ry], [rz, 1.0, -rx], [-ry, rx, 1.0]]
}

fn mul(m: &Mat3, v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn invert(m: &Mat3) -> Option<Mat3> {
    let c00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
    let c01 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
    let c02 = m[1][0] * m[2][1] - m[1][1] * m[2][0];
    let det = m[0][0] * c00 + m[0][1] * c01 + m[0][2] * c02;
    if det.abs() < f64::EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    Some([
        [
            c00 * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            c01 * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            c02 * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ],
    ])
}

/// `X' = T + (1 + s) R X`
pub fn helmert_forward(p: &HelmertParams, xyz: [f64; 3]) -> [f64; 3] {
    let scale = 1.0 + p.scale * 1e-9;
    let r = mul(&rotation(p), xyz);
    [
        p.tx + scale * r[0],
        p.ty + scale * r[1],
        p.tz + scale * r[2],
    ]
}

/// Exact inverse of [`helmert_forward`]. A degenerate rotation leaves the
/// input untouched.
pub fn helmert_inverse(p: &HelmertParams, xyz: [f64; 3]) -> [f64; 3] {
    let Some(r_inv) = invert(&rotation(p)) else {
        return xyz;
    };
    let scale = 1.0 + p.scale * 1e-9;
    let shifted = [
        (xyz[0] - p.tx) / scale,
        (xyz[1] - p.ty) / scale,
        (xyz[2] - p.tz) / scale,
    ];
    mul(&r_inv, shifted)
}
