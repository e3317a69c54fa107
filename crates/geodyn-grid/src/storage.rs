//! Local-directory grid storage provider.

use std::path::{Path, PathBuf};

use geodyn_core::traits::GridStorage;
use tracing::trace;

/// Searches a list of directories, in order, for grid files.
#[derive(Debug, Clone, Default)]
pub struct DirectoryGridStorage {
    search_paths: Vec<PathBuf>,
}

impl DirectoryGridStorage {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl GridStorage for DirectoryGridStorage {
    fn locate(&self, file_name: &str) -> Option<PathBuf> {
        let direct = Path::new(file_name);
        if direct.is_absolute() {
            return direct.is_file().then(|| direct.to_path_buf());
        }
        for dir in &self.search_paths {
            let candidate = dir.join(file_name);
            trace!(path = %candidate.display(), "probing for grid");
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_directory_wins() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        std::fs::write(a.path().join("g.json"), "{}").unwrap();
        std::fs::write(b.path().join("g.json"), "{}").unwrap();
        let storage = DirectoryGridStorage::new(vec![b.path().into(), a.path().into()]);
        assert_eq!(storage.locate("g.json"), Some(b.path().join("g.json")));
    }

    #[test]
    fn missing_file_is_none() {
        let a = tempfile::tempdir().unwrap();
        let storage = DirectoryGridStorage::new(vec![a.path().into()]);
        assert_eq!(storage.locate("absent.json"), None);
    }

    #[test]
    fn absolute_paths_bypass_search_list() {
        let a = tempfile::tempdir().unwrap();
        let path = a.path().join("abs.json");
        std::fs::write(&path, "{}").unwrap();
        let storage = DirectoryGridStorage::default();
        assert_eq!(storage.locate(path.to_str().unwrap()), Some(path));
    }
}
