//! JSON file storage for datasets.
//!
//! A dataset file is a pretty-printed JSON array of entries. Writes go to
//! a sibling temp file first and are renamed into place, so a crash mid-save
//! leaves the previous file intact.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{backup_path, DatasetStore};
use crate::types::dataset::Dataset;

/// Dataset store backed by JSON files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDatasetStore;

impl JsonDatasetStore {
    pub fn new() -> Self {
        Self
    }

    /// Read the dataset at `path`, failing on unreadable or invalid files.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub async fn read(&self, path: &Path) -> StoreResult<Option<Dataset>> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(path, e)),
        };

        let dataset = serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(dataset))
    }
}

#[async_trait]
impl DatasetStore for JsonDatasetStore {
    async fn load(&self, path: &Path) -> StoreResult<Dataset> {
        match self.read(path).await {
            Ok(Some(dataset)) => {
                debug!(path = %path.display(), entries = dataset.len(), "Loaded dataset");
                Ok(dataset)
            }
            Ok(None) => {
                debug!(path = %path.display(), "No dataset file yet, starting empty");
                Ok(Dataset::new())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable dataset, starting empty");
                Ok(Dataset::new())
            }
        }
    }

    async fn save(&self, dataset: &Dataset, path: &Path, backup: bool) -> StoreResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }

        if backup && tokio::fs::try_exists(path).await.unwrap_or(false) {
            let backup = backup_path(path);
            tokio::fs::copy(path, &backup)
                .await
                .map_err(|e| io_error(&backup, e))?;
            info!(path = %backup.display(), "Created backup");
        }

        let json = serde_json::to_vec_pretty(dataset).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let tmp = temp_path(path);
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| io_error(path, e))?;

        debug!(path = %path.display(), entries = dataset.len(), "Saved dataset");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
