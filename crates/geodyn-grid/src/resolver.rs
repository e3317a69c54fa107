//! GridResolver: lazy, concurrently shared resolution of deformation models.
//!
//! Successful resolutions are published into a `DashMap` with an
//! insert-if-absent; concurrent resolutions of the same reference may race
//! and the first to publish wins. Unavailable results are not cached, so a
//! later call retries once the missing grid has been acquired.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use geodyn_core::config::GridConfig;
use geodyn_core::errors::GridError;
use geodyn_core::models::{DeformationModel, EulerPole, ModelDefinition};
use geodyn_core::traits::{DeformationResolver, GridStorage};
use geodyn_core::types::{AccuracyClass, ModelRef};
use tracing::{debug, trace, warn};

use crate::format;
use crate::plate_models;
use crate::storage::DirectoryGridStorage;

/// Counters describing resolver activity since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Resolution attempts that missed the cache.
    pub resolutions: u64,
    pub cache_hits: u64,
    /// Attempts that ended unavailable.
    pub failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    resolutions: AtomicU64,
    cache_hits: AtomicU64,
    failures: AtomicU64,
}

/// Where a single resolution attempt looks next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Grid,
    Plate,
}

/// The process-wide registry of resolved deformation models.
pub struct GridResolver {
    storage: Arc<dyn GridStorage>,
    definitions: HashMap<ModelRef, ModelDefinition>,
    plates: HashMap<String, EulerPole>,
    prefer_analytical: bool,
    cache: DashMap<ModelRef, Arc<DeformationModel>>,
    counters: Counters,
}

impl GridResolver {
    pub fn new(storage: Arc<dyn GridStorage>) -> Self {
        Self {
            storage,
            definitions: HashMap::new(),
            plates: HashMap::new(),
            prefer_analytical: false,
            cache: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Resolver over `DirectoryGridStorage` with the configured search paths,
    /// model definitions, and analytical preference.
    pub fn from_config(config: &GridConfig) -> Self {
        let storage = Arc::new(DirectoryGridStorage::new(config.search_paths.clone()));
        debug!(paths = ?storage.search_paths(), models = config.models.len(), "grid resolver configured");
        let mut resolver =
            Self::new(storage).with_prefer_analytical(config.effective_prefer_analytical());
        for definition in &config.models {
            resolver = resolver.with_definition(definition.clone());
        }
        resolver
    }

    pub fn with_definition(mut self, definition: ModelDefinition) -> Self {
        self.definitions
            .insert(definition.reference.clone(), definition);
        self
    }

    /// Register a custom plate pole under `id`, shadowing any built-in one.
    pub fn with_plate(mut self, id: impl Into<String>, pole: EulerPole) -> Self {
        self.plates.insert(id.into(), pole);
        self
    }

    pub fn with_prefer_analytical(mut self, prefer: bool) -> Self {
        self.prefer_analytical = prefer;
        self
    }

    /// Resolve `reference`, consulting the cache first.
    pub fn resolve_model(&self, reference: &ModelRef) -> Arc<DeformationModel> {
        if let Some(hit) = self.cache.get(reference) {
            self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
            trace!(model = %reference, "deformation model cache hit");
            return hit.value().clone();
        }

        self.counters.resolutions.fetch_add(1, Ordering::Relaxed);
        let model = self.attempt(reference);
        if !model.is_available() {
            self.counters.failures.fetch_add(1, Ordering::Relaxed);
            return Arc::new(model);
        }

        let model = Arc::new(model);
        let published = self
            .cache
            .entry(reference.clone())
            .or_insert_with(|| model.clone())
            .value()
            .clone();
        published
    }

    /// Cached model for `reference`, without attempting resolution.
    pub fn cached(&self, reference: &ModelRef) -> Option<Arc<DeformationModel>> {
        self.cache.get(reference).map(|e| e.value().clone())
    }

    /// Drop a cached entry so the next call re-resolves it.
    pub fn invalidate(&self, reference: &ModelRef) -> bool {
        self.cache.remove(reference).is_some()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn cached_models(&self) -> Vec<Arc<DeformationModel>> {
        self.cache.iter().map(|e| e.value().clone()).collect()
    }

    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            resolutions: self.counters.resolutions.load(Ordering::Relaxed),
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    fn definition_for(&self, reference: &ModelRef) -> ModelDefinition {
        if let Some(def) = self.definitions.get(reference) {
            return def.clone();
        }
        // Undeclared: a plate identifier is its own analytical model,
        // anything else is looked up as `<reference>.json`.
        if self.pole(reference.as_str()).is_some() {
            ModelDefinition::plate(reference.clone(), reference.as_str())
        } else {
            ModelDefinition::grid(reference.clone(), format!("{reference}.json"))
        }
    }

    fn pole(&self, id: &str) -> Option<EulerPole> {
        self.plates
            .get(id)
            .cloned()
            .or_else(|| plate_models::builtin_pole(id))
    }

    fn attempt(&self, reference: &ModelRef) -> DeformationModel {
        let definition = self.definition_for(reference);
        let order = if self.prefer_analytical {
            [Source::Plate, Source::Grid]
        } else {
            [Source::Grid, Source::Plate]
        };

        let mut failures = Vec::new();
        for source in order {
            match source {
                Source::Grid => {
                    let Some(file) = definition.grid.as_deref() else {
                        continue;
                    };
                    match self.load_grid(reference, file) {
                        Ok(model) => return model,
                        Err(e) => {
                            debug!(model = %reference, file, error = %e, "grid unavailable");
                            failures.push(e.to_string());
                        }
                    }
                }
                Source::Plate => {
                    let Some(plate_id) = definition.plate.as_deref() else {
                        continue;
                    };
                    match self.pole(plate_id) {
                        Some(pole) => {
                            let accuracy = if definition.plate_is_authoritative() {
                                AccuracyClass::Best
                            } else {
                                warn!(
                                    model = %reference,
                                    plate = plate_id,
                                    "substituting plate model for authoritative grid"
                                );
                                AccuracyClass::Degraded
                            };
                            debug!(model = %reference, plate = plate_id, ?accuracy, "resolved plate model");
                            return DeformationModel::Plate {
                                reference: reference.clone(),
                                pole,
                                accuracy,
                            };
                        }
                        None => failures.push(format!("unknown plate model {plate_id}")),
                    }
                }
            }
        }

        let reason = if failures.is_empty() {
            "no grid or plate model declared".to_string()
        } else {
            failures.join("; ")
        };
        warn!(model = %reference, reason = %reason, "deformation model unavailable");
        DeformationModel::unavailable(reference.clone(), reason)
    }

    fn load_grid(&self, reference: &ModelRef, file: &str) -> Result<DeformationModel, GridError> {
        let path = self.storage.locate(file).ok_or_else(|| GridError::NotFound {
            reference: file.to_string(),
        })?;
        let grid = format::load_grid(&path)?;
        let (rows, cols) = grid.shape();
        debug!(model = %reference, path = %path.display(), rows, cols, "resolved velocity grid");
        Ok(DeformationModel::Grid {
            reference: reference.clone(),
            grid: Arc::new(grid),
            accuracy: AccuracyClass::Best,
            source: path,
        })
    }
}

impl DeformationResolver for GridResolver {
    fn resolve(&self, reference: &ModelRef) -> Arc<DeformationModel> {
        self.resolve_model(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uplift_json() -> &'static str {
        r#"{"lat_min":40,"lon_min":-80,"lat_step":10,"lon_step":10,"rows":2,"cols":2,
            "east":[0,0,0,0],"north":[0,0,0,0],"up":[2.09,2.09,2.09,2.09]}"#
    }

    fn resolver_in(dir: &std::path::Path) -> GridResolver {
        GridResolver::new(Arc::new(DirectoryGridStorage::new(vec![dir.to_path_buf()])))
    }

    #[test]
    fn grid_on_disk_resolves_best() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("VG.json"), uplift_json()).unwrap();
        let resolver = resolver_in(dir.path()).with_definition(ModelDefinition::grid("VG", "VG.json"));
        let model = resolver.resolve_model(&"VG".into());
        assert!(matches!(*model, DeformationModel::Grid { .. }));
        assert_eq!(model.accuracy(), AccuracyClass::Best);
    }

    #[test]
    fn missing_grid_with_plate_fallback_is_degraded() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver_in(dir.path()).with_definition(
            ModelDefinition::grid("VG", "VG.json").with_plate_fallback("ITRF2014-PMM:NOAM"),
        );
        let model = resolver.resolve_model(&"VG".into());
        assert!(matches!(*model, DeformationModel::Plate { .. }));
        assert_eq!(model.accuracy(), AccuracyClass::Degraded);
    }

    #[test]
    fn plate_only_definition_is_best() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver_in(dir.path());
        let model = resolver.resolve_model(&"ITRF2014-PMM:EURA".into());
        assert_eq!(model.accuracy(), AccuracyClass::Best);
    }

    #[test]
    fn nothing_found_is_unavailable_and_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver_in(dir.path());
        let model = resolver.resolve_model(&"MISSING".into());
        assert_eq!(model.accuracy(), AccuracyClass::Unavailable);
        assert!(resolver.cached(&"MISSING".into()).is_none());
        assert_eq!(resolver.stats().failures, 1);
    }

    #[test]
    fn retry_succeeds_after_grid_appears() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver_in(dir.path());
        assert!(!resolver.resolve_model(&"LATE".into()).is_available());
        std::fs::write(dir.path().join("LATE.json"), uplift_json()).unwrap();
        assert!(resolver.resolve_model(&"LATE".into()).is_available());
    }

    #[test]
    fn second_call_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver_in(dir.path());
        let a = resolver.resolve_model(&"ITRF2014-PMM:NOAM".into());
        let b = resolver.resolve_model(&"ITRF2014-PMM:NOAM".into());
        assert!(Arc::ptr_eq(&a, &b));
        let stats = resolver.stats();
        assert_eq!(stats.resolutions, 1);
        assert_eq!(stats.cache_hits, 1);
    }

    #[test]
    fn prefer_analytical_tries_plate_first() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("VG.json"), uplift_json()).unwrap();
        let resolver = resolver_in(dir.path())
            .with_definition(ModelDefinition::grid("VG", "VG.json").with_plate_fallback("ITRF2014-PMM:NOAM"))
            .with_prefer_analytical(true);
        let model = resolver.resolve_model(&"VG".into());
        assert!(matches!(*model, DeformationModel::Plate { .. }));
    }

    #[test]
    fn malformed_grid_falls_through_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("BAD.json"), "[]").unwrap();
        let resolver = resolver_in(dir.path());
        let model = resolver.resolve_model(&"BAD".into());
        match &*model {
            DeformationModel::Unavailable { reason, .. } => assert!(reason.contains("malformed")),
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn oversized_grid_header_degrades_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("BIG.json"),
            r#"{"lat_min":0,"lon_min":0,"lat_step":1,"lon_step":1,
               "rows":4294967296,"cols":4294967296,"east":[],"north":[]}"#,
        )
        .unwrap();
        let resolver = resolver_in(dir.path());
        let model = resolver.resolve_model(&"BIG".into());
        assert!(matches!(*model, DeformationModel::Unavailable { .. }));
        assert!(resolver.cached(&"BIG".into()).is_none());
        assert_eq!(resolver.stats().failures, 1);
    }

    #[test]
    fn invalidate_forces_re_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = resolver_in(dir.path());
        let reference = ModelRef::from("ITRF2014-PMM:PCFC");
        resolver.resolve_model(&reference);
        assert!(resolver.invalidate(&reference));
        resolver.resolve_model(&reference);
        assert_eq!(resolver.stats().resolutions, 2);
    }
}
