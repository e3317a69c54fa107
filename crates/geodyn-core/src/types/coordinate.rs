//! Coordinate tuples and the coordinate systems that give their axes meaning.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::epoch::Epoch;

/// Axis storage: up to four axes inline before spilling to the heap.
pub type Axes = SmallVec<[f64; 4]>;

/// An ordered tuple of numeric axes with an optional per-point timestamp.
///
/// Axis count and order are defined by the frame's [`CoordinateSystem`].
/// `time`, when present, overrides the request-level source epoch for
/// 4D-aware steps applied to this point only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub axes: Axes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Epoch>,
}

impl Coordinate {
    pub fn new(axes: &[f64]) -> Self {
        Self {
            axes: SmallVec::from_slice(axes),
            time: None,
        }
    }

    /// Build from `[x, y, z, t]`, moving the fourth axis into `time`.
    pub fn from_4d(values: [f64; 4]) -> Self {
        Self {
            axes: SmallVec::from_slice(&values[..3]),
            time: Some(Epoch::from_decimal_year(values[3])),
        }
    }

    pub fn with_time(mut self, time: Epoch) -> Self {
        self.time = Some(time);
        self
    }

    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    pub fn axis(&self, index: usize) -> Option<f64> {
        self.axes.get(index).copied()
    }

    /// Axes as `[a, b, c]`, with a missing third axis read as zero.
    pub fn xyz(&self) -> Option<[f64; 3]> {
        match self.axes.as_slice() {
            [a, b] => Some([*a, *b, 0.0]),
            [a, b, c, ..] => Some([*a, *b, *c]),
            _ => None,
        }
    }
}

/// Geodetic position in degrees and metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub lat: f64,
    pub lon: f64,
    /// `None` for 2D positions; vertical motion is then ignored.
    pub height: Option<f64>,
}

impl Geodetic {
    pub fn new(lat: f64, lon: f64, height: f64) -> Self {
        Self {
            lat,
            lon,
            height: Some(height),
        }
    }

    pub fn horizontal(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            height: None,
        }
    }

    /// Read `[lat, lon, (h)]` from a coordinate.
    pub fn from_coordinate(coord: &Coordinate) -> Option<Self> {
        match coord.axes.as_slice() {
            [lat, lon] => Some(Self::horizontal(*lat, *lon)),
            [lat, lon, h, ..] => Some(Self::new(*lat, *lon, *h)),
            _ => None,
        }
    }

    /// Write back into the leading axes of `coord`, leaving extra axes alone.
    pub fn write_into(&self, coord: &mut Coordinate) {
        if coord.axes.len() >= 2 {
            coord.axes[0] = self.lat;
            coord.axes[1] = self.lon;
        }
        if let (Some(h), Some(slot)) = (self.height, coord.axes.get_mut(2)) {
            *slot = h;
        }
    }
}

/// Map projection applied on top of a geographic base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMethod {
    /// Spherical Mercator on the ellipsoid's semi-major axis (EPSG:1024).
    WebMercator,
}

/// Axis layout of a frame's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystem {
    /// `[lat, lon]` in degrees.
    Geographic2d,
    /// `[lat, lon, h]` in degrees and metres.
    Geographic3d,
    /// `[X, Y, Z]` Earth-centred metres.
    Geocentric,
    /// `[easting, northing, (h)]` in metres.
    Projected(ProjectionMethod),
}

impl CoordinateSystem {
    pub fn is_geographic(self) -> bool {
        matches!(self, Self::Geographic2d | Self::Geographic3d)
    }

    /// Number of axes the system natively carries.
    pub fn dimension(self) -> usize {
        match self {
            Self::Geographic2d => 2,
            Self::Geographic3d | Self::Geocentric => 3,
            Self::Projected(_) => 2,
        }
    }
}
