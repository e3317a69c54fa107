//! Moves a geographic position from one epoch to another within a single
//! dynamic frame, using a deformation model.

use geodyn_core::models::DeformationModel;
use geodyn_core::types::{Ellipsoid, Epoch, Geodetic};

/// What happened to a position handed to the propagator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationStatus {
    /// The model supplied a velocity and the position moved.
    Applied,
    /// `from == to`; the model was not consulted.
    ZeroInterval,
    /// The model is unavailable; the position is returned unchanged.
    ModelUnavailable,
    /// The position is outside the model's coverage or the arithmetic
    /// failed; returned unchanged.
    OutsideCoverage,
}

impl PropagationStatus {
    /// Whether the returned position carries the full expected accuracy.
    pub fn is_degraded(self) -> bool {
        matches!(self, Self::ModelUnavailable | Self::OutsideCoverage)
    }
}

/// Stateless epoch propagation. Safe to call from many threads at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpochPropagator;

impl EpochPropagator {
    /// `propagate(p, m, t, t) == p`, and the model is never consulted for a
    /// zero interval.
    pub fn propagate(
        position: Geodetic,
        model: &DeformationModel,
        from: Epoch,
        to: Epoch,
        ellipsoid: Ellipsoid,
    ) -> Geodetic {
        Self::propagate_with_status(position, model, from, to, ellipsoid).0
    }

    pub fn propagate_with_status(
        position: Geodetic,
        model: &DeformationModel,
        from: Epoch,
        to: Epoch,
        ellipsoid: Ellipsoid,
    ) -> (Geodetic, PropagationStatus) {
        let dt = from.years_until(to);
        if dt == 0.0 {
            return (position, PropagationStatus::ZeroInterval);
        }
        if !dt.is_finite() {
            return (position, PropagationStatus::OutsideCoverage);
        }

        let moved = match model {
            DeformationModel::Unavailable { .. } => {
                return (position, PropagationStatus::ModelUnavailable);
            }
            DeformationModel::Grid { grid, .. } => grid
                .interpolate(position.lat, position.lon)
                .and_then(|v| displace_enu(position, [v.east, v.north, v.up], dt, ellipsoid)),
            DeformationModel::Plate { pole, .. } => {
                let h = position.height.unwrap_or(0.0);
                let xyz = ellipsoid.to_geocentric(position.lat, position.lon, h);
                let v = pole.velocity_ecef(xyz);
                let moved = [xyz[0] + v[0] * dt, xyz[1] + v[1] * dt, xyz[2] + v[2] * dt];
                let (lat, lon, h) = ellipsoid.to_geodetic(moved);
                let out = Geodetic {
                    lat,
                    lon,
                    height: position.height.map(|_| h),
                };
                is_finite(&out).then_some(out)
            }
        };

        match moved {
            Some(p) => (p, PropagationStatus::Applied),
            None => (position, PropagationStatus::OutsideCoverage),
        }
    }
}

/// Apply an ENU velocity (m/yr) over `dt` years using the local radii of
/// curvature.
fn displace_enu(p: Geodetic, enu: [f64; 3], dt: f64, ell: Ellipsoid) -> Option<Geodetic> {
    let phi = p.lat.to_radians();
    let h = p.height.unwrap_or(0.0);
    let m = ell.meridional_radius(phi) + h;
    let n = ell.prime_vertical_radius(phi) + h;
    let cos_phi = phi.cos();
    if cos_phi.abs() < 1e-12 {
        return None;
    }

    let out = Geodetic {
        lat: p.lat + (enu[1] * dt / m).to_degrees(),
        lon: p.lon + (enu[0] * dt / (n * cos_phi)).to_degrees(),
        height: p.height.map(|h| h + enu[2] * dt),
    };
    is_finite(&out).then_some(out)
}

fn is_finite(p: &Geodetic) -> bool {
    p.lat.is_finite() && p.lon.is_finite() && p.height.map_or(true, f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use geodyn_core::models::{EnuVelocity, EulerPole, VelocityGrid};
    use geodyn_core::types::{AccuracyClass, ModelRef};

    fn uplift_model(up: f64) -> DeformationModel {
        let grid = VelocityGrid::uniform(
            "uplift",
            (40.0, 50.0),
            (-80.0, -70.0),
            EnuVelocity {
                east: 0.0,
                north: 0.0,
                up,
            },
        )
        .unwrap();
        DeformationModel::Grid {
            reference: ModelRef::from("UPLIFT"),
            grid: Arc::new(grid),
            accuracy: AccuracyClass::Best,
            source: PathBuf::from("uplift.json"),
        }
    }

    fn e(y: f64) -> Epoch {
        Epoch::from_decimal_year(y)
    }

    #[test]
    fn uplift_moves_height_only() {
        let p = Geodetic::new(45.0, -75.0, 100.0);
        let out = EpochPropagator::propagate(p, &uplift_model(0.00209), e(2010.0), e(2020.0), Ellipsoid::Grs80);
        assert_eq!(out.lat, 45.0);
        assert_eq!(out.lon, -75.0);
        assert!((out.height.unwrap() - 100.0209).abs() < 1e-9);
    }

    #[test]
    fn zero_interval_is_exact_identity_even_when_unavailable() {
        let p = Geodetic::new(45.0, -75.0, 100.0);
        let model = DeformationModel::unavailable(ModelRef::from("X"), "missing");
        let (out, status) =
            EpochPropagator::propagate_with_status(p, &model, e(2015.0), e(2015.0), Ellipsoid::Grs80);
        assert_eq!(out, p);
        assert_eq!(status, PropagationStatus::ZeroInterval);
    }

    #[test]
    fn unavailable_model_leaves_position_alone() {
        let p = Geodetic::new(45.0, -75.0, 100.0);
        let model = DeformationModel::unavailable(ModelRef::from("X"), "missing");
        let (out, status) =
            EpochPropagator::propagate_with_status(p, &model, e(2010.0), e(2020.0), Ellipsoid::Grs80);
        assert_eq!(out, p);
        assert!(status.is_degraded());
    }

    #[test]
    fn outside_grid_coverage_is_reported() {
        let p = Geodetic::new(10.0, 10.0, 0.0);
        let (out, status) = EpochPropagator::propagate_with_status(
            p,
            &uplift_model(0.01),
            e(2010.0),
            e(2020.0),
            Ellipsoid::Grs80,
        );
        assert_eq!(out, p);
        assert_eq!(status, PropagationStatus::OutsideCoverage);
    }

    #[test]
    fn two_dimensional_positions_ignore_vertical_motion() {
        let p = Geodetic::horizontal(45.0, -75.0);
        let out = EpochPropagator::propagate(p, &uplift_model(0.01), e(2010.0), e(2020.0), Ellipsoid::Grs80);
        assert_eq!(out.height, None);
    }

    #[test]
    fn plate_rotation_moves_a_few_centimetres_per_year() {
        // North American plate, ITRF2014-PMM.
        let model = DeformationModel::Plate {
            reference: ModelRef::from("NOAM"),
            pole: EulerPole::new("NOAM", 0.024, -0.694, -0.063),
            accuracy: AccuracyClass::Best,
        };
        let p = Geodetic::new(45.0, -75.0, 0.0);
        let out = EpochPropagator::propagate(p, &model, e(2010.0), e(2011.0), Ellipsoid::Grs80);
        let dlat_m = (out.lat - p.lat).to_radians() * 6_371_000.0;
        let dlon_m = (out.lon - p.lon).to_radians() * 6_371_000.0 * 45f64.to_radians().cos();
        let speed = (dlat_m * dlat_m + dlon_m * dlon_m).sqrt();
        assert!(speed > 0.005 && speed < 0.05, "speed {speed} m/yr");
        assert!(out.height.unwrap().abs() < 1e-3);
    }

    #[test]
    fn forward_then_back_returns_to_start() {
        let model = uplift_model(0.003);
        let p = Geodetic::new(44.0, -76.0, 50.0);
        let fwd = EpochPropagator::propagate(p, &model, e(2000.0), e(2030.0), Ellipsoid::Grs80);
        let back = EpochPropagator::propagate(fwd, &model, e(2030.0), e(2000.0), Ellipsoid::Grs80);
        assert!((back.height.unwrap() - 50.0).abs() < 1e-9);
    }
}
