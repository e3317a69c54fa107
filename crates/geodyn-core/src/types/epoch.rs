//! Decimal-year epochs and per-request epoch pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in time expressed as a decimal year (e.g. `2010.0`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Epoch(f64);

impl Epoch {
    pub const fn from_decimal_year(year: f64) -> Self {
        Self(year)
    }

    pub fn decimal_year(self) -> f64 {
        self.0
    }

    /// Signed elapsed years from `self` to `later`.
    pub fn years_until(self, later: Epoch) -> f64 {
        later.0 - self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Bit pattern used as a hashable cache key component.
    pub fn key_bits(self) -> u64 {
        // Normalise -0.0 so it keys the same as 0.0.
        if self.0 == 0.0 {
            0
        } else {
            self.0.to_bits()
        }
    }
}

impl From<f64> for Epoch {
    fn from(year: f64) -> Self {
        Self(year)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Request-level source and target epochs, supplied once per transformation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EpochRequest {
    pub source: Option<Epoch>,
    pub target: Option<Epoch>,
}

impl EpochRequest {
    pub fn new(source: Option<Epoch>, target: Option<Epoch>) -> Self {
        Self { source, target }
    }

    /// Both absent, or both present and equal.
    pub fn is_time_neutral(&self) -> bool {
        match (self.source, self.target) {
            (None, None) => true,
            (Some(s), Some(t)) => s == t,
            _ => false,
        }
    }

    /// First non-finite supplied epoch, if any.
    pub fn first_non_finite(&self) -> Option<Epoch> {
        [self.source, self.target]
            .into_iter()
            .flatten()
            .find(|e| !e.is_finite())
    }
}
