//! Runs a selected pipeline over a coordinate batch.

use geodyn_core::types::{Coordinate, Geodetic};
use rayon::prelude::*;

use crate::datum_shift::ShiftKind;
use crate::pipeline::{Pipeline, Step};
use crate::propagator::EpochPropagator;

/// Transformed batch plus a count of positions that could not be carried
/// through every step at full accuracy.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub coordinates: Vec<Coordinate>,
    pub degraded_points: usize,
}

/// Applies pipeline steps coordinate by coordinate. Output order and
/// length always match the input; a position that fails a step keeps its
/// pre-step value for that step.
#[derive(Debug, Clone, Copy)]
pub struct TransformExecutor {
    parallel_threshold: usize,
}

impl TransformExecutor {
    /// Batches of at least `parallel_threshold` coordinates run on the
    /// rayon pool.
    pub fn new(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    pub fn execute(&self, pipeline: &Pipeline, batch: &[Coordinate]) -> ExecutionReport {
        if pipeline.is_identity() {
            return ExecutionReport {
                coordinates: batch.to_vec(),
                degraded_points: 0,
            };
        }

        let results: Vec<(Coordinate, bool)> = if batch.len() >= self.parallel_threshold {
            batch.par_iter().map(|c| run_one(pipeline, c)).collect()
        } else {
            batch.iter().map(|c| run_one(pipeline, c)).collect()
        };

        let degraded_points = results.iter().filter(|(_, degraded)| *degraded).count();
        ExecutionReport {
            coordinates: results.into_iter().map(|(c, _)| c).collect(),
            degraded_points,
        }
    }
}

impl Default for TransformExecutor {
    fn default() -> Self {
        Self::new(4096)
    }
}

fn run_one(pipeline: &Pipeline, input: &Coordinate) -> (Coordinate, bool) {
    let mut coord = input.clone();
    let mut degraded = false;
    for step in pipeline.steps() {
        degraded |= !apply_step(step, &mut coord);
    }
    (coord, degraded)
}

/// Returns false when the step could not be applied in full.
fn apply_step(step: &Step, coord: &mut Coordinate) -> bool {
    match step {
        Step::Identity { .. } => true,
        Step::Projection(conversion) => conversion.apply(coord),
        Step::DatumShift(shift) if shift.kind == ShiftKind::SameRealization => true,
        Step::DatumShift(shift) => {
            if coord.dimension() < 3 {
                return false;
            }
            let Some(xyz) = coord.xyz() else {
                return false;
            };
            let out = shift.apply(xyz, coord.time);
            if out.iter().any(|v| !v.is_finite()) {
                return false;
            }
            coord.axes[..3].copy_from_slice(&out);
            true
        }
        Step::EpochPropagation(p) => {
            let Some(position) = Geodetic::from_coordinate(coord) else {
                return false;
            };
            let from = p.from.resolve(coord.time);
            let (moved, status) =
                EpochPropagator::propagate_with_status(position, &p.model, from, p.to, p.ellipsoid);
            moved.write_into(coord);
            !status.is_degraded()
        }
    }
}
