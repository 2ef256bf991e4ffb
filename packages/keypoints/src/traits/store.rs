//! Dataset storage trait.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::StoreResult;
use crate::types::dataset::Dataset;

/// Load/save access to persisted datasets.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Load the dataset at `path`.
    ///
    /// A missing file is an empty dataset, not an error.
    async fn load(&self, path: &Path) -> StoreResult<Dataset>;

    /// Write `dataset` to `path`.
    ///
    /// When `backup` is set and a previous file exists, its bytes are copied
    /// to [`backup_path`] before being overwritten.
    async fn save(&self, dataset: &Dataset, path: &Path, backup: bool) -> StoreResult<()>;
}

/// Backup location for a dataset file: `data.json` → `data.json.backup`.
pub fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("json.backup")
}

/// Default output for a verification run: `data.json` → `data_verified.json`.
pub fn verified_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{}_verified.{}", stem, ext.to_string_lossy()),
        None => format!("{}_verified", stem),
    };
    input.with_file_name(file_name)
}
