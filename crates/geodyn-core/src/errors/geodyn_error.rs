use super::error_code::{self, GeodynErrorCode};
use super::GridError;
use crate::types::AccuracyClass;

/// Top-level error type for the transformation engine.
/// Frame lookup and epoch validation errors are raised when a transformer is
/// built, never while executing a batch.
#[derive(Debug, thiserror::Error)]
pub enum GeodynError {
    #[error("unknown frame: {id}")]
    UnknownFrame { id: String },

    #[error("incompatible epochs: {reason}")]
    IncompatibleEpochs { reason: String },

    #[error("no pipeline from {source_frame} to {target_frame} meets the best accuracy bar (best available: {best})")]
    NoAccuratePipeline {
        source_frame: String,
        target_frame: String,
        best: AccuracyClass,
    },

    #[error("invalid frame {id}: {reason}")]
    InvalidFrame { id: String, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GeodynErrorCode for GeodynError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownFrame { .. } => error_code::UNKNOWN_FRAME,
            Self::IncompatibleEpochs { .. } => error_code::INCOMPATIBLE_EPOCHS,
            Self::NoAccuratePipeline { .. } => error_code::NO_ACCURATE_PIPELINE,
            Self::InvalidFrame { .. } => error_code::INVALID_FRAME,
            Self::Config(_) => error_code::CONFIG_ERROR,
            Self::Grid(e) => e.error_code(),
            Self::Io(_) => error_code::IO_ERROR,
            Self::Serialization(_) => error_code::SERIALIZATION_ERROR,
        }
    }
}

impl From<toml::de::Error> for GeodynError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Convenience type alias.
pub type GeodynResult<T> = Result<T, GeodynError>;
