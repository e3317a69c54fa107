//! Datum route enumeration: which chains of Helmert transformations connect
//! two datums.

use geodyn_core::models::HelmertTransform;
use geodyn_core::traits::CrsProvider;
use geodyn_core::types::FrameId;

use crate::datum_shift::{DatumShiftStep, ShiftKind};

/// Routes from `from` to `to`: the same-realization shift when the datums
/// match, otherwise direct (either orientation) and two-hop routes through
/// a hub datum. Falls back to a single ballpark shift when nothing connects.
pub fn datum_routes(provider: &dyn CrsProvider, from: &FrameId, to: &FrameId) -> Vec<Vec<DatumShiftStep>> {
    if from == to {
        return vec![vec![DatumShiftStep::same_realization(from)]];
    }

    let first_legs = provider.datum_shifts_involving(from);
    let mut routes = Vec::new();

    for t in &first_legs {
        if t.other_end(from) == Some(to) {
            routes.push(vec![DatumShiftStep::oriented(t.clone(), from, ShiftKind::Published)]);
        }
    }

    for t1 in &first_legs {
        let Some(hub) = t1.other_end(from) else {
            continue;
        };
        if hub == to || hub == from {
            continue;
        }
        for t2 in provider.datum_shifts_involving(hub) {
            if same_transform(t1, &t2) || t2.other_end(hub) != Some(to) {
                continue;
            }
            routes.push(vec![
                DatumShiftStep::oriented(t1.clone(), from, ShiftKind::Published),
                DatumShiftStep::oriented(t2, hub, ShiftKind::Published),
            ]);
        }
    }

    if routes.is_empty() {
        tracing::debug!(from = %from, to = %to, "no catalogued route, using ballpark shift");
        routes.push(vec![DatumShiftStep::ballpark(from, to)]);
    }
    routes
}

fn same_transform(a: &HelmertTransform, b: &HelmertTransform) -> bool {
    a.source == b.source && a.target == b.target && a.name == b.name
}
