//! Coordinate conversions within one datum: geographic <-> geocentric,
//! geographic <-> Web Mercator, and 3D -> 2D geographic.

use std::f64::consts::FRAC_PI_4;
use std::fmt;

use geodyn_core::types::{Coordinate, Ellipsoid, ProjectionMethod};
use smallvec::SmallVec;

/// Latitude limit beyond which Mercator northings are not computed.
const MERCATOR_MAX_LAT: f64 = 89.999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `[lat, lon, (h)]` <-> `[X, Y, Z]`. Forward adds a zero height to 2D input.
    Geocentric(Ellipsoid),
    /// `[lat, lon, ...]` <-> `[E, N, ...]`.
    Projection(ProjectionMethod, Ellipsoid),
    /// Forward drops the height axis; inverse adds a zero height.
    Geographic2d,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionStep {
    pub conversion: Conversion,
    pub direction: Direction,
}

impl ConversionStep {
    pub fn forward(conversion: Conversion) -> Self {
        Self {
            conversion,
            direction: Direction::Forward,
        }
    }

    pub fn inverse(conversion: Conversion) -> Self {
        Self {
            conversion,
            direction: Direction::Inverse,
        }
    }

    /// Apply in place. Returns false, leaving `coord` untouched, when the
    /// input cannot be converted (too few axes, pole in Mercator, NaN).
    pub fn apply(&self, coord: &mut Coordinate) -> bool {
        if coord.axes.len() < 2 {
            return false;
        }
        match (self.conversion, self.direction) {
            (Conversion::Geocentric(ell), Direction::Forward) => {
                let Some([lat, lon, h]) = coord.xyz() else {
                    return false;
                };
                let xyz = ell.to_geocentric(lat, lon, h);
                write_leading3(coord, xyz)
            }
            (Conversion::Geocentric(ell), Direction::Inverse) => {
                if coord.axes.len() < 3 {
                    return false;
                }
                let Some(xyz) = coord.xyz() else {
                    return false;
                };
                let (lat, lon, h) = ell.to_geodetic(xyz);
                write_leading3(coord, [lat, lon, h])
            }
            (Conversion::Projection(ProjectionMethod::WebMercator, ell), dir) => {
                let a = ell.semi_major_axis();
                let (u, v) = (coord.axes[0], coord.axes[1]);
                let out = match dir {
                    Direction::Forward => web_mercator_forward(a, u, v),
                    Direction::Inverse => web_mercator_inverse(a, u, v),
                };
                match out {
                    Some((p, q)) => {
                        coord.axes[0] = p;
                        coord.axes[1] = q;
                        true
                    }
                    None => false,
                }
            }
            (Conversion::Geographic2d, Direction::Forward) => {
                if coord.axes.len() >= 3 {
                    coord.axes.remove(2);
                }
                true
            }
            (Conversion::Geographic2d, Direction::Inverse) => {
                if coord.axes.len() == 2 {
                    coord.axes.push(0.0);
                }
                true
            }
        }
    }
}

impl fmt::Display for ConversionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.conversion {
            Conversion::Geocentric(ell) => format!("geocentric({ell:?})"),
            Conversion::Projection(ProjectionMethod::WebMercator, _) => "webmerc".to_string(),
            Conversion::Geographic2d => "geog2d".to_string(),
        };
        match self.direction {
            Direction::Forward => write!(f, "{name}"),
            Direction::Inverse => write!(f, "inv {name}"),
        }
    }
}

fn write_leading3(coord: &mut Coordinate, values: [f64; 3]) -> bool {
    if values.iter().any(|v| !v.is_finite()) {
        return false;
    }
    let mut axes: SmallVec<[f64; 4]> = SmallVec::from_slice(&values);
    if coord.axes.len() > 3 {
        axes.extend_from_slice(&coord.axes[3..]);
    }
    coord.axes = axes;
    true
}

fn web_mercator_forward(a: f64, lat: f64, lon: f64) -> Option<(f64, f64)> {
    if !lat.is_finite() || !lon.is_finite() || lat.abs() > MERCATOR_MAX_LAT {
        return None;
    }
    let easting = a * lon.to_radians();
    let northing = a * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Some((easting, northing))
}

fn web_mercator_inverse(a: f64, easting: f64, northing: f64) -> Option<(f64, f64)> {
    if !easting.is_finite() || !northing.is_finite() {
        return None;
    }
    let lon = (easting / a).to_degrees();
    let lat = (2.0 * (northing / a).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
    Some((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocentric_forward_adds_height_to_2d_input() {
        let mut c = Coordinate::new(&[0.0, 0.0]);
        assert!(ConversionStep::forward(Conversion::Geocentric(Ellipsoid::Wgs84)).apply(&mut c));
        assert_eq!(c.dimension(), 3);
        assert!((c.axes[0] - 6_378_137.0).abs() < 1e-6);
    }

    #[test]
    fn geocentric_round_trip_keeps_extra_axes() {
        let conv = Conversion::Geocentric(Ellipsoid::Grs80);
        let mut c = Coordinate::new(&[45.0, -75.0, 120.0, 7.0]);
        assert!(ConversionStep::forward(conv).apply(&mut c));
        assert!(ConversionStep::inverse(conv).apply(&mut c));
        assert!((c.axes[0] - 45.0).abs() < 1e-10);
        assert!((c.axes[1] + 75.0).abs() < 1e-10);
        assert!((c.axes[2] - 120.0).abs() < 1e-6);
        assert_eq!(c.axes[3], 7.0);
    }

    #[test]
    fn web_mercator_known_value() {
        let conv = Conversion::Projection(ProjectionMethod::WebMercator, Ellipsoid::Wgs84);
        let mut c = Coordinate::new(&[0.0, 180.0]);
        assert!(ConversionStep::forward(conv).apply(&mut c));
        assert!((c.axes[0] - 20_037_508.342_789_244).abs() < 1e-6);
        assert!(c.axes[1].abs() < 1e-6);
    }

    #[test]
    fn web_mercator_round_trip() {
        let conv = Conversion::Projection(ProjectionMethod::WebMercator, Ellipsoid::Wgs84);
        let mut c = Coordinate::new(&[45.4215, -75.6972, 10.0]);
        assert!(ConversionStep::forward(conv).apply(&mut c));
        assert!(ConversionStep::inverse(conv).apply(&mut c));
        assert!((c.axes[0] - 45.4215).abs() < 1e-9);
        assert!((c.axes[1] + 75.6972).abs() < 1e-9);
        assert_eq!(c.axes[2], 10.0);
    }

    #[test]
    fn mercator_rejects_poles_without_touching_input() {
        let conv = Conversion::Projection(ProjectionMethod::WebMercator, Ellipsoid::Wgs84);
        let mut c = Coordinate::new(&[90.0, 0.0]);
        assert!(!ConversionStep::forward(conv).apply(&mut c));
        assert_eq!(c.axes.as_slice(), &[90.0, 0.0]);
    }

    #[test]
    fn geographic_2d_drops_and_restores_height() {
        let mut c = Coordinate::new(&[1.0, 2.0, 3.0]);
        assert!(ConversionStep::forward(Conversion::Geographic2d).apply(&mut c));
        assert_eq!(c.axes.as_slice(), &[1.0, 2.0]);
        assert!(ConversionStep::inverse(Conversion::Geographic2d).apply(&mut c));
        assert_eq!(c.axes.as_slice(), &[1.0, 2.0, 0.0]);
    }
}
