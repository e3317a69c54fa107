//! Velocity/deformation models: gridded velocity fields and rigid plate
//! rotations, tagged with the accuracy class they were resolved at.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::GridError;
use crate::types::{AccuracyClass, ModelRef};

/// Milliarcseconds to radians.
pub const MAS_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0 * 1000.0);

/// Tolerance when testing whether a point lies on a grid edge.
const EDGE_EPSILON: f64 = 1e-9;

/// Local east/north/up velocity in metres per year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnuVelocity {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

/// Regular latitude/longitude grid of ENU velocities, stored row-major from
/// the south-west corner (rows step north, columns step east).
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityGrid {
    name: String,
    lat_min: f64,
    lon_min: f64,
    lat_step: f64,
    lon_step: f64,
    rows: usize,
    cols: usize,
    east: Vec<f64>,
    north: Vec<f64>,
    up: Vec<f64>,
}

impl VelocityGrid {
    /// Build a grid from node values already in metres per year.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        lat_min: f64,
        lon_min: f64,
        lat_step: f64,
        lon_step: f64,
        rows: usize,
        cols: usize,
        east: Vec<f64>,
        north: Vec<f64>,
        up: Vec<f64>,
    ) -> Result<Self, GridError> {
        let name = name.into();
        let malformed = |reason: String| GridError::Malformed {
            source_name: name.clone(),
            reason,
        };

        if rows < 2 || cols < 2 {
            return Err(malformed(format!(
                "grid needs at least 2x2 nodes, got {rows}x{cols}"
            )));
        }
        if !(lat_step > 0.0 && lon_step > 0.0) {
            return Err(malformed(format!(
                "steps must be positive, got lat_step={lat_step} lon_step={lon_step}"
            )));
        }
        if !lat_min.is_finite() || !lon_min.is_finite() {
            return Err(malformed("grid origin must be finite".to_string()));
        }
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| malformed(format!("{rows}x{cols} nodes overflow")))?;
        for (axis, values) in [("east", &east), ("north", &north), ("up", &up)] {
            if values.len() != expected {
                return Err(malformed(format!(
                    "{axis} has {} values, expected {expected}",
                    values.len()
                )));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(malformed(format!("{axis} contains non-finite values")));
            }
        }

        Ok(Self {
            name,
            lat_min,
            lon_min,
            lat_step,
            lon_step,
            rows,
            cols,
            east,
            north,
            up,
        })
    }

    /// A grid with one constant velocity over the given extent.
    pub fn uniform(
        name: impl Into<String>,
        lat_range: (f64, f64),
        lon_range: (f64, f64),
        velocity: EnuVelocity,
    ) -> Result<Self, GridError> {
        let (lat_lo, lat_hi) = lat_range;
        let (lon_lo, lon_hi) = lon_range;
        Self::new(
            name,
            lat_lo,
            lon_lo,
            lat_hi - lat_lo,
            lon_hi - lon_lo,
            2,
            2,
            vec![velocity.east; 4],
            vec![velocity.north; 4],
            vec![velocity.up; 4],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn node(&self, row: usize, col: usize) -> EnuVelocity {
        let i = row * self.cols + col;
        EnuVelocity {
            east: self.east[i],
            north: self.north[i],
            up: self.up[i],
        }
    }

    /// Bilinear interpolation at a geographic position; `None` outside
    /// coverage.
    pub fn interpolate(&self, lat: f64, lon: f64) -> Option<EnuVelocity> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        let fr = (lat - self.lat_min) / self.lat_step;
        let lon_offset = (lon - self.lon_min).rem_euclid(360.0);
        let fc = lon_offset / self.lon_step;

        let max_r = (self.rows - 1) as f64;
        let max_c = (self.cols - 1) as f64;
        if fr < -EDGE_EPSILON || fr > max_r + EDGE_EPSILON {
            return None;
        }
        if fc > max_c + EDGE_EPSILON {
            return None;
        }
        let fr = fr.clamp(0.0, max_r);
        let fc = fc.clamp(0.0, max_c);

        let r0 = (fr.floor() as usize).min(self.rows - 2);
        let c0 = (fc.floor() as usize).min(self.cols - 2);
        let tr = fr - r0 as f64;
        let tc = fc - c0 as f64;

        let v00 = self.node(r0, c0);
        let v01 = self.node(r0, c0 + 1);
        let v10 = self.node(r0 + 1, c0);
        let v11 = self.node(r0 + 1, c0 + 1);
        let blend = |a: f64, b: f64, c: f64, d: f64| {
            (1.0 - tr) * ((1.0 - tc) * a + tc * b) + tr * ((1.0 - tc) * c + tc * d)
        };

        Some(EnuVelocity {
            east: blend(v00.east, v01.east, v10.east, v11.east),
            north: blend(v00.north, v01.north, v10.north, v11.north),
            up: blend(v00.up, v01.up, v10.up, v11.up),
        })
    }
}

/// Rigid plate rotation about an Euler pole, as Cartesian rotation rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EulerPole {
    pub plate: String,
    /// Rotation rate components in milliarcseconds per year.
    pub wx: f64,
    pub wy: f64,
    pub wz: f64,
}

impl EulerPole {
    pub fn new(plate: impl Into<String>, wx: f64, wy: f64, wz: f64) -> Self {
        Self {
            plate: plate.into(),
            wx,
            wy,
            wz,
        }
    }

    /// Geocentric velocity (m/yr) of a point at `xyz`: `ω × r`.
    pub fn velocity_ecef(&self, xyz: [f64; 3]) -> [f64; 3] {
        let w = [
            self.wx * MAS_TO_RAD,
            self.wy * MAS_TO_RAD,
            self.wz * MAS_TO_RAD,
        ];
        let [x, y, z] = xyz;
        [
            w[1] * z - w[2] * y,
            w[2] * x - w[0] * z,
            w[0] * y - w[1] * x,
        ]
    }
}

/// A resolved deformation model. Never mutated once published to a cache.
#[derive(Debug, Clone)]
pub enum DeformationModel {
    Grid {
        reference: ModelRef,
        grid: Arc<VelocityGrid>,
        accuracy: AccuracyClass,
        source: PathBuf,
    },
    Plate {
        reference: ModelRef,
        pole: EulerPole,
        accuracy: AccuracyClass,
    },
    Unavailable {
        reference: ModelRef,
        reason: String,
    },
}

impl DeformationModel {
    pub fn unavailable(reference: ModelRef, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reference,
            reason: reason.into(),
        }
    }

    pub fn reference(&self) -> &ModelRef {
        match self {
            Self::Grid { reference, .. }
            | Self::Plate { reference, .. }
            | Self::Unavailable { reference, .. } => reference,
        }
    }

    pub fn accuracy(&self) -> AccuracyClass {
        match self {
            Self::Grid { accuracy, .. } | Self::Plate { accuracy, .. } => *accuracy,
            Self::Unavailable { .. } => AccuracyClass::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable { .. })
    }

    /// Where the model came from: a grid path, `plate:<NAME>`, or `none`.
    pub fn source_label(&self) -> String {
        match self {
            Self::Grid { source, .. } => source.display().to_string(),
            Self::Plate { pole, .. } => format!("plate:{}", pole.plate),
            Self::Unavailable { .. } => "none".to_string(),
        }
    }

    /// Velocity uncertainty (m/yr) used for ranking; `None` when unavailable.
    pub fn velocity_uncertainty(&self) -> Option<f64> {
        match self {
            Self::Grid { .. } => Some(0.001),
            Self::Plate { .. } => Some(0.002),
            Self::Unavailable { .. } => None,
        }
    }
}
