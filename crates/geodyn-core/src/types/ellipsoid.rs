//! Reference ellipsoids and geodetic <-> geocentric conversion.

use serde::{Deserialize, Serialize};

/// Reference ellipsoid of a geodetic datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ellipsoid {
    #[serde(rename = "GRS80")]
    Grs80,
    #[serde(rename = "WGS84")]
    Wgs84,
    #[serde(rename = "Clarke1866")]
    Clarke1866,
}

impl Ellipsoid {
    /// Semi-major axis in metres.
    pub fn semi_major_axis(self) -> f64 {
        match self {
            Self::Grs80 | Self::Wgs84 => 6_378_137.0,
            Self::Clarke1866 => 6_378_206.4,
        }
    }

    pub fn inverse_flattening(self) -> f64 {
        match self {
            Self::Grs80 => 298.257_222_101,
            Self::Wgs84 => 298.257_223_563,
            Self::Clarke1866 => 294.978_698_213_898,
        }
    }

    pub fn flattening(self) -> f64 {
        1.0 / self.inverse_flattening()
    }

    /// First eccentricity squared.
    pub fn eccentricity_squared(self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    /// Prime vertical radius of curvature at `lat_rad`.
    pub fn prime_vertical_radius(self, lat_rad: f64) -> f64 {
        let s = lat_rad.sin();
        self.semi_major_axis() / (1.0 - self.eccentricity_squared() * s * s).sqrt()
    }

    /// Meridional radius of curvature at `lat_rad`.
    pub fn meridional_radius(self, lat_rad: f64) -> f64 {
        let e2 = self.eccentricity_squared();
        let s = lat_rad.sin();
        self.semi_major_axis() * (1.0 - e2) / (1.0 - e2 * s * s).powf(1.5)
    }

    /// Geodetic (degrees, degrees, metres) to Earth-centred Cartesian metres.
    pub fn to_geocentric(self, lat_deg: f64, lon_deg: f64, h: f64) -> [f64; 3] {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();
        let n = self.prime_vertical_radius(lat);
        let e2 = self.eccentricity_squared();
        [
            (n + h) * lat.cos() * lon.cos(),
            (n + h) * lat.cos() * lon.sin(),
            (n * (1.0 - e2) + h) * lat.sin(),
        ]
    }

    /// Earth-centred Cartesian metres to geodetic (degrees, degrees, metres).
    pub fn to_geodetic(self, xyz: [f64; 3]) -> (f64, f64, f64) {
        let [x, y, z] = xyz;
        let a = self.semi_major_axis();
        let e2 = self.eccentricity_squared();
        let p = x.hypot(y);
        let lon = y.atan2(x);

        let mut lat = z.atan2(p * (1.0 - e2));
        for _ in 0..10 {
            let n = self.prime_vertical_radius(lat);
            let h = p * lat.cos() + z * lat.sin() - a * a / n;
            let next = z.atan2(p * (1.0 - e2 * n / (n + h)));
            let converged = (next - lat).abs() < 1e-14;
            lat = next;
            if converged {
                break;
            }
        }
        let n = self.prime_vertical_radius(lat);
        let h = p * lat.cos() + z * lat.sin() - a * a / n;
        (lat.to_degrees(), lon.to_degrees(), h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_prime_meridian_maps_to_semi_major_axis() {
        let xyz = Ellipsoid::Grs80.to_geocentric(0.0, 0.0, 0.0);
        assert!((xyz[0] - 6_378_137.0).abs() < 1e-6);
        assert!(xyz[1].abs() < 1e-6);
        assert!(xyz[2].abs() < 1e-6);
    }

    #[test]
    fn geocentric_round_trip() {
        for ell in [Ellipsoid::Grs80, Ellipsoid::Wgs84, Ellipsoid::Clarke1866] {
            for &(lat, lon, h) in &[
                (45.4215, -75.6972, 100.0),
                (-33.86, 151.21, 58.0),
                (89.9, 10.0, 0.0),
                (-0.0001, 179.999, -30.0),
            ] {
                let xyz = ell.to_geocentric(lat, lon, h);
                let (lat2, lon2, h2) = ell.to_geodetic(xyz);
                assert!((lat - lat2).abs() < 1e-10, "lat {lat} vs {lat2}");
                assert!((lon - lon2).abs() < 1e-10, "lon {lon} vs {lon2}");
                assert!((h - h2).abs() < 1e-6, "h {h} vs {h2}");
            }
        }
    }

    #[test]
    fn radii_are_ordered_at_mid_latitude() {
        let lat = 45f64.to_radians();
        let ell = Ellipsoid::Grs80;
        assert!(ell.prime_vertical_radius(lat) > ell.meridional_radius(lat));
    }
}
