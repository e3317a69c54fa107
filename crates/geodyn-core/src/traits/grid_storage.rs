//! `GridStorage`: the grid storage provider.

use std::path::PathBuf;

/// Locates grid files that are already present locally. Acquisition
/// (download, caching from a remote repository) is out of scope here.
pub trait GridStorage: Send + Sync {
    /// Path to `file_name` if present locally.
    fn locate(&self, file_name: &str) -> Option<PathBuf>;
}
