//! Grid Resolver errors. These stay inside the resolver: a failed resolution
//! is published to callers as an unavailable model, not as an error.

use std::path::PathBuf;

use super::error_code::{self, GeodynErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("no local grid or model for {reference}")]
    NotFound { reference: String },

    #[error("malformed grid {source_name}: {reason}")]
    Malformed { source_name: String, reason: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl GeodynErrorCode for GridError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::GRID_NOT_FOUND,
            Self::Malformed { .. } => error_code::GRID_MALFORMED,
            Self::Io { .. } => error_code::GRID_IO,
        }
    }
}
