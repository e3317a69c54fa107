//! Property-based tests for propagation and batch execution guarantees.
//!
//! 1. Round trip: propagate(propagate(p, t1, t2), t2, t1) ~= p
//! 2. Zero interval: propagate(p, t, t) == p exactly
//! 3. Batches keep length and order
//! 4. Static to static is the identity whatever the epochs

mod common;

use std::sync::Arc;

use common::*;
use geodyn_core::config::TransformConfig;
use geodyn_core::models::{DeformationModel, EnuVelocity, EulerPole, HelmertParams};
use geodyn_core::types::{AccuracyClass, Coordinate, Ellipsoid, Geodetic, ModelRef};
use geodyn_core::InMemoryCatalog;
use geodyn_engine::datum_shift::{helmert_forward, helmert_inverse};
use geodyn_engine::{EpochPropagator, TransformRequest, Transformer};
use proptest::prelude::*;

// =============================================================================
// Strategy helpers
// =============================================================================

fn position_strategy() -> impl Strategy<Value = Geodetic> {
    (41.0f64..69.0, -139.0f64..-51.0, -100.0f64..3000.0)
        .prop_map(|(lat, lon, h)| Geodetic::new(lat, lon, h))
}

fn epoch_strategy() -> impl Strategy<Value = f64> {
    1990.0f64..2040.0
}

fn grid_model() -> DeformationModel {
    uniform_model(
        "VEL",
        EnuVelocity {
            east: 0.015,
            north: -0.010,
            up: 0.003,
        },
    )
}

fn plate_model() -> DeformationModel {
    DeformationModel::Plate {
        reference: ModelRef::from("NOAM"),
        pole: EulerPole::new("NOAM", 0.024, -0.694, -0.063),
        accuracy: AccuracyClass::Best,
    }
}

fn engine(parallel_threshold: usize) -> Transformer {
    let catalog = InMemoryCatalog::new()
        .with_frame(dynamic_frame("DYN", "D", 2010.0, Some("VEL")))
        .unwrap()
        .with_frame(static_frame("STAT-1", "D"))
        .unwrap()
        .with_frame(static_frame("STAT-2", "D"))
        .unwrap();
    let config = TransformConfig {
        parallel_threshold,
        ..TransformConfig::default()
    };
    Transformer::new(
        Arc::new(catalog),
        Arc::new(CountingResolver::with(vec![grid_model()])),
        config,
    )
}

fn assert_close(a: Geodetic, b: Geodetic, height_tol: f64) {
    assert!((a.lat - b.lat).abs() < 1e-10, "lat {} vs {}", a.lat, b.lat);
    assert!((a.lon - b.lon).abs() < 1e-10, "lon {} vs {}", a.lon, b.lon);
    assert!((a.height.unwrap() - b.height.unwrap()).abs() < height_tol);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn grid_propagation_round_trips(p in position_strategy(), t1 in epoch_strategy(), t2 in epoch_strategy()) {
        let model = grid_model();
        let (t1, t2) = (epoch(t1), epoch(t2));
        let there = EpochPropagator::propagate(p, &model, t1, t2, Ellipsoid::Grs80);
        let back = EpochPropagator::propagate(there, &model, t2, t1, Ellipsoid::Grs80);
        assert_close(back, p, 1e-6);
    }

    #[test]
    fn plate_propagation_round_trips(p in position_strategy(), t1 in epoch_strategy(), t2 in epoch_strategy()) {
        let model = plate_model();
        let (t1, t2) = (epoch(t1), epoch(t2));
        let there = EpochPropagator::propagate(p, &model, t1, t2, Ellipsoid::Grs80);
        let back = EpochPropagator::propagate(there, &model, t2, t1, Ellipsoid::Grs80);
        assert_close(back, p, 1e-5);
    }

    #[test]
    fn zero_interval_is_exact(p in position_strategy(), t in epoch_strategy()) {
        for model in [grid_model(), plate_model()] {
            prop_assert_eq!(EpochPropagator::propagate(p, &model, epoch(t), epoch(t), Ellipsoid::Grs80), p);
        }
    }

    #[test]
    fn batches_keep_length_and_order(
        points in prop::collection::vec(position_strategy(), 0..64),
        target in epoch_strategy(),
    ) {
        let batch: Vec<Coordinate> = points
            .iter()
            .map(|p| Coordinate::new(&[p.lat, p.lon, p.height.unwrap_or(0.0)]))
            .collect();
        let request = TransformRequest::new("DYN", "DYN").source_epoch(2010.0).target_epoch(target);

        // Threshold 8 sends most batches through the rayon path.
        let out = engine(8).transform(&request, &batch).unwrap();
        prop_assert_eq!(out.coordinates.len(), batch.len());

        let single = engine(usize::MAX);
        for (input, output) in batch.iter().zip(&out.coordinates) {
            let alone = single.transform(&request, std::slice::from_ref(input)).unwrap();
            prop_assert_eq!(&alone.coordinates[0], output);
        }
    }

    #[test]
    fn static_to_static_is_identity(
        p in position_strategy(),
        es in proptest::option::of(epoch_strategy()),
        et in proptest::option::of(epoch_strategy()),
    ) {
        let mut request = TransformRequest::new("STAT-1", "STAT-2");
        request.epochs.source = es.map(epoch);
        request.epochs.target = et.map(epoch);
        let input = Coordinate::new(&[p.lat, p.lon, p.height.unwrap_or(0.0)]);
        let out = engine(usize::MAX).transform(&request, std::slice::from_ref(&input)).unwrap();
        prop_assert_eq!(&out.coordinates[0], &input);
        prop_assert_eq!(out.metadata.accuracy, AccuracyClass::Best);
    }

    #[test]
    fn helmert_inverse_undoes_forward(
        t in prop::array::uniform3(-5.0f64..5.0),
        r in prop::array::uniform3(-50.0f64..50.0),
        scale in -10.0f64..10.0,
        p in position_strategy(),
    ) {
        let params = HelmertParams { tx: t[0], ty: t[1], tz: t[2], rx: r[0], ry: r[1], rz: r[2], scale };
        let x = Ellipsoid::Grs80.to_geocentric(p.lat, p.lon, p.height.unwrap_or(0.0));
        let back = helmert_inverse(&params, helmert_forward(&params, x));
        for i in 0..3 {
            prop_assert!((back[i] - x[i]).abs() < 1e-6);
        }
    }
}
