//! Accuracy class of a resolved deformation model or pipeline step.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether the authoritative time-dependent model was actually used.
///
/// Ordered so that `Best > Degraded > Unavailable`; the worst class of a
/// chain is its minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyClass {
    /// No model could be found; propagation is a no-op.
    Unavailable,
    /// A coarser substitute stood in for a missing authoritative model.
    Degraded,
    /// The authoritative grid or model was used.
    Best,
}

impl AccuracyClass {
    pub fn is_best(self) -> bool {
        self == Self::Best
    }

    /// Worst class across an iterator; `Best` for an empty iterator.
    pub fn worst_of(classes: impl IntoIterator<Item = AccuracyClass>) -> AccuracyClass {
        classes.into_iter().min().unwrap_or(Self::Best)
    }
}

impl fmt::Display for AccuracyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "unavailable"),
            Self::Degraded => write!(f, "degraded"),
            Self::Best => write!(f, "best"),
        }
    }
}
