//! In-memory dataset storage for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{backup_path, DatasetStore};
use crate::types::dataset::Dataset;

/// One recorded call to [`MemoryDatasetStore::save`].
#[derive(Debug, Clone)]
pub struct SaveRecord {
    pub path: PathBuf,
    pub backup: bool,

    /// Snapshot of the dataset as it was saved
    pub dataset: Dataset,
}

/// Dataset store keyed by path, held in memory.
///
/// Backups land under [`backup_path`] like the file store. Every save is
/// recorded, including ones configured to fail.
#[derive(Default)]
pub struct MemoryDatasetStore {
    files: RwLock<HashMap<PathBuf, Dataset>>,
    saves: RwLock<Vec<SaveRecord>>,
    fail_saves: bool,
}

impl MemoryDatasetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a dataset at `path`.
    pub fn with_dataset(self, path: impl Into<PathBuf>, dataset: Dataset) -> Self {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), dataset);
        self
    }

    /// Make every save fail with an I/O error.
    pub fn with_failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    /// Dataset currently stored at `path`.
    pub fn get(&self, path: &Path) -> Option<Dataset> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    /// All save calls, oldest first.
    pub fn saves(&self) -> Vec<SaveRecord> {
        self.saves
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DatasetStore for MemoryDatasetStore {
    async fn load(&self, path: &Path) -> StoreResult<Dataset> {
        Ok(self.get(path).unwrap_or_default())
    }

    async fn save(&self, dataset: &Dataset, path: &Path, backup: bool) -> StoreResult<()> {
        self.saves
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SaveRecord {
                path: path.to_path_buf(),
                backup,
                dataset: dataset.clone(),
            });

        if self.fail_saves {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only store"),
            });
        }

        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        if backup {
            if let Some(previous) = files.get(path).cloned() {
                files.insert(backup_path(path), previous);
            }
        }
        files.insert(path.to_path_buf(), dataset.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::dataset::DatasetEntry;

    #[tokio::test]
    async fn test_missing_path_loads_empty() {
        let store = MemoryDatasetStore::new();
        let dataset = store.load(Path::new("nope.json")).await.unwrap();
        assert!(dataset.is_empty());
    }

    #[tokio::test]
    async fn test_backup_keeps_previous_contents() {
        let path = Path::new("data.json");
        let old = Dataset::from_entries(vec![DatasetEntry::new("old", "* old")]);
        let new = Dataset::from_entries(vec![DatasetEntry::new("new", "* new")]);
        let store = MemoryDatasetStore::new().with_dataset(path, old.clone());

        store.save(&new, path, true).await.unwrap();

        assert_eq!(store.get(path), Some(new));
        assert_eq!(store.get(Path::new("data.json.backup")), Some(old));
    }

    #[tokio::test]
    async fn test_no_backup_without_prior_file() {
        let path = Path::new("fresh.json");
        let store = MemoryDatasetStore::new();

        store.save(&Dataset::new(), path, true).await.unwrap();

        assert!(store.get(&backup_path(path)).is_none());
        assert_eq!(store.saves().len(), 1);
    }
}
