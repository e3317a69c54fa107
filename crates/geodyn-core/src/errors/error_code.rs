//! Stable machine-readable error codes.

pub const UNKNOWN_FRAME: &str = "UNKNOWN_FRAME";
pub const INCOMPATIBLE_EPOCHS: &str = "INCOMPATIBLE_EPOCHS";
pub const NO_ACCURATE_PIPELINE: &str = "NO_ACCURATE_PIPELINE";
pub const INVALID_FRAME: &str = "INVALID_FRAME";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const GRID_NOT_FOUND: &str = "GRID_NOT_FOUND";
pub const GRID_MALFORMED: &str = "GRID_MALFORMED";
pub const GRID_IO: &str = "GRID_IO";
pub const IO_ERROR: &str = "IO_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";

/// Implemented by every error enum to expose a stable code for callers that
/// branch on error kind across an API boundary.
pub trait GeodynErrorCode {
    fn error_code(&self) -> &'static str;
}
