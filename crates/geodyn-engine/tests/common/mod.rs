//! Shared fixtures for engine integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use geodyn_core::models::{DeformationModel, EnuVelocity, VelocityGrid};
use geodyn_core::traits::DeformationResolver;
use geodyn_core::types::{
    AccuracyClass, CoordinateSystem, Ellipsoid, Epoch, FrameDescriptor, ModelRef,
};
use geodyn_core::InMemoryCatalog;
use geodyn_engine::Transformer;
use geodyn_grid::{DirectoryGridStorage, GridResolver};

/// Resolver returning fixed models and counting calls.
#[derive(Default)]
pub struct CountingResolver {
    pub models: Vec<Arc<DeformationModel>>,
    pub calls: AtomicUsize,
}

impl CountingResolver {
    pub fn with(models: Vec<DeformationModel>) -> Self {
        Self {
            models: models.into_iter().map(Arc::new).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DeformationResolver for CountingResolver {
    fn resolve(&self, reference: &ModelRef) -> Arc<DeformationModel> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.models
            .iter()
            .find(|m| m.reference() == reference)
            .cloned()
            .unwrap_or_else(|| Arc::new(DeformationModel::unavailable(reference.clone(), "not registered")))
    }
}

pub fn epoch(year: f64) -> Epoch {
    Epoch::from_decimal_year(year)
}

/// Uniform velocity grid model covering most of Canada.
pub fn uniform_model(reference: &str, velocity: EnuVelocity) -> DeformationModel {
    let grid = VelocityGrid::uniform(reference, (40.0, 70.0), (-140.0, -50.0), velocity).unwrap();
    DeformationModel::Grid {
        reference: ModelRef::from(reference),
        grid: Arc::new(grid),
        accuracy: AccuracyClass::Best,
        source: format!("{reference}.json").into(),
    }
}

pub fn uplift(up_m_per_yr: f64) -> EnuVelocity {
    EnuVelocity {
        east: 0.0,
        north: 0.0,
        up: up_m_per_yr,
    }
}

pub fn dynamic_frame(id: &str, datum: &str, reference_epoch: f64, model: Option<&str>) -> FrameDescriptor {
    FrameDescriptor::new_dynamic(
        id,
        datum,
        Ellipsoid::Grs80,
        CoordinateSystem::Geographic3d,
        epoch(reference_epoch),
        model.map(ModelRef::from),
    )
}

pub fn static_frame(id: &str, datum: &str) -> FrameDescriptor {
    FrameDescriptor::new_static(id, datum, Ellipsoid::Grs80, CoordinateSystem::Geographic3d)
}

/// Writes a uniform grid file in mm/yr covering most of Canada.
pub fn write_uniform_grid(dir: &Path, file_name: &str, east: f64, north: f64, up: f64) {
    let json = serde_json::json!({
        "lat_min": 40.0, "lon_min": -140.0, "lat_step": 30.0, "lon_step": 90.0,
        "rows": 2, "cols": 2, "units": "mm/yr",
        "east": vec![east; 4], "north": vec![north; 4], "up": vec![up; 4],
    });
    std::fs::write(dir.join(file_name), json.to_string()).unwrap();
}

/// Built-in catalog over a grid directory.
pub fn builtin_engine(grid_dir: &Path) -> Transformer {
    let resolver = GridResolver::new(Arc::new(DirectoryGridStorage::new(vec![grid_dir.to_path_buf()])));
    Transformer::new(
        Arc::new(InMemoryCatalog::builtin()),
        Arc::new(resolver),
        Default::default(),
    )
}
