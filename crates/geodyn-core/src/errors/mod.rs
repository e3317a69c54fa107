//! Error types for every geodyn subsystem.

pub mod error_code;
mod geodyn_error;
mod grid_error;

pub use error_code::GeodynErrorCode;
pub use geodyn_error::{GeodynError, GeodynResult};
pub use grid_error::GridError;
