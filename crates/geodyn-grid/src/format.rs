//! JSON velocity grid files.
//!
//! ```json
//! { "name": "NAD83v70VG", "lat_min": 40.0, "lon_min": -80.0,
//!   "lat_step": 0.5, "lon_step": 0.5, "rows": 3, "cols": 4,
//!   "units": "mm/yr", "east": [...], "north": [...], "up": [...] }
//! ```
//!
//! Node arrays are row-major from the south-west corner.

use std::path::Path;

use geodyn_core::errors::GridError;
use geodyn_core::models::VelocityGrid;
use serde::{Deserialize, Serialize};

/// Velocity units accepted in grid files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VelocityUnits {
    #[default]
    #[serde(rename = "mm/yr")]
    MillimetresPerYear,
    #[serde(rename = "m/yr")]
    MetresPerYear,
}

impl VelocityUnits {
    fn to_metres_per_year(self) -> f64 {
        match self {
            Self::MillimetresPerYear => 0.001,
            Self::MetresPerYear => 1.0,
        }
    }
}

/// On-disk layout of a velocity grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridFile {
    #[serde(default)]
    pub name: Option<String>,
    pub lat_min: f64,
    pub lon_min: f64,
    pub lat_step: f64,
    pub lon_step: f64,
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub units: VelocityUnits,
    pub east: Vec<f64>,
    pub north: Vec<f64>,
    #[serde(default)]
    pub up: Vec<f64>,
}

impl GridFile {
    /// Validate and convert into an in-memory grid (velocities in m/yr).
    /// A missing `up` array means no vertical motion.
    pub fn into_grid(self, fallback_name: &str) -> Result<VelocityGrid, GridError> {
        let scale = self.units.to_metres_per_year();
        let name = self.name.unwrap_or_else(|| fallback_name.to_string());
        let malformed = |reason: String| GridError::Malformed {
            source_name: name.clone(),
            reason,
        };
        let nodes = self
            .rows
            .checked_mul(self.cols)
            .ok_or_else(|| malformed(format!("{}x{} nodes overflow", self.rows, self.cols)))?;
        // Header and data must agree before anything is sized from the header.
        for (axis, len) in [("east", self.east.len()), ("north", self.north.len())] {
            if len != nodes {
                return Err(malformed(format!("{axis} has {len} values, expected {nodes}")));
            }
        }

        let convert = |v: Vec<f64>| v.into_iter().map(|x| x * scale).collect::<Vec<_>>();
        let up = if self.up.is_empty() {
            vec![0.0; nodes]
        } else {
            convert(self.up)
        };
        VelocityGrid::new(
            name,
            self.lat_min,
            self.lon_min,
            self.lat_step,
            self.lon_step,
            self.rows,
            self.cols,
            convert(self.east),
            convert(self.north),
            up,
        )
    }
}

/// Read and validate a grid file.
pub fn load_grid(path: &Path) -> Result<VelocityGrid, GridError> {
    let text = std::fs::read_to_string(path).map_err(|source| GridError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: GridFile = serde_json::from_str(&text).map_err(|e| GridError::Malformed {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("grid")
        .to_string();
    file.into_grid(&stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_millimetre_grid_as_metres() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "uplift.json",
            r#"{"lat_min":40,"lon_min":-80,"lat_step":10,"lon_step":10,"rows":2,"cols":2,
               "east":[0,0,0,0],"north":[0,0,0,0],"up":[2.09,2.09,2.09,2.09]}"#,
        );
        let grid = load_grid(&path).unwrap();
        assert_eq!(grid.name(), "uplift");
        let v = grid.interpolate(45.0, -75.0).unwrap();
        assert!((v.up - 0.00209).abs() < 1e-12);
    }

    #[test]
    fn missing_up_defaults_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "h.json",
            r#"{"lat_min":0,"lon_min":0,"lat_step":1,"lon_step":1,"rows":2,"cols":2,
               "units":"m/yr","east":[1,1,1,1],"north":[0,0,0,0]}"#,
        );
        let v = load_grid(&path).unwrap().interpolate(0.5, 0.5).unwrap();
        assert_eq!(v.up, 0.0);
        assert!((v.east - 1.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.json", "{ not json");
        assert!(matches!(load_grid(&path), Err(GridError::Malformed { .. })));
    }

    #[test]
    fn overflowing_dimensions_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "big.json",
            r#"{"lat_min":0,"lon_min":0,"lat_step":1,"lon_step":1,
               "rows":4294967296,"cols":4294967296,"east":[],"north":[]}"#,
        );
        match load_grid(&path) {
            Err(GridError::Malformed { reason, .. }) => assert!(reason.contains("overflow"), "{reason}"),
            other => panic!("expected malformed grid, got {other:?}"),
        }
    }

    #[test]
    fn header_larger_than_data_is_rejected_before_allocating() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "huge.json",
            r#"{"lat_min":0,"lon_min":0,"lat_step":1,"lon_step":1,
               "rows":4000000000,"cols":4,"east":[0,0,0,0],"north":[0,0,0,0]}"#,
        );
        match load_grid(&path) {
            Err(GridError::Malformed { reason, .. }) => assert!(reason.contains("east"), "{reason}"),
            other => panic!("expected malformed grid, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_path_is_io() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_grid(&dir.path().join("absent.json")),
            Err(GridError::Io { .. })
        ));
    }
}
