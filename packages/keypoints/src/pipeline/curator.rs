//! Curator - the dataset workflows built on the pipeline.
//!
//! The curator ties a content fetcher, a key-point generator, a dataset
//! store and an optional fact checker together:
//! - `extract_from_url`: fetch → generate (with regeneration) → entry
//! - `process_urls`: append entries for a batch of URLs, saving as it goes
//! - `verify_dataset`: run the verification driver over a stored dataset
//! - `clean_dataset` / `validate_dataset`: maintenance passes
//!
//! # Example
//!
//! ```rust,ignore
//! use keypoints::{Curator, ExtractionConfig, ProcessOptions};
//!
//! let curator = Curator::new(fetcher, generator, store)
//!     .with_fact_checker(Arc::new(verifier))
//!     .with_config(ExtractionConfig::new().with_auto_check(true));
//!
//! let report = curator
//!     .process_urls(&urls, Path::new("dataset.json"), &ProcessOptions::default())
//!     .await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{KeyPointsError, Result, StoreResult};
use crate::pipeline::clean::clean_references;
use crate::pipeline::dataset::{verify_dataset_with_progress, EntryProgress, VerificationReport};
use crate::pipeline::regenerate::generate_verified;
use crate::pipeline::verify::aggregate;
use crate::traits::ai::{FactChecker, KeyPointGenerator};
use crate::traits::fetcher::ContentFetcher;
use crate::traits::store::DatasetStore;
use crate::types::config::{ExtractionConfig, ProcessOptions, VerifyDatasetConfig};
use crate::types::dataset::{DatasetEntry, DatasetStats};

/// Outcome of one URL in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlStatus {
    /// An entry was appended to the dataset
    Added,

    /// Fetching or generation failed
    Failed(String),
}

/// Progress notification sent after each URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlProgress<'a> {
    pub index: usize,
    pub total: usize,
    pub url: &'a str,
    pub status: UrlStatus,
}

/// Summary of a URL batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    /// Entries appended to the dataset
    pub added: usize,

    /// URLs that produced no entry, with the reason
    pub failed: Vec<(String, String)>,

    /// Dataset size after the run
    pub total_entries: usize,

    /// Saves that failed; the entries stay in memory for the next save
    pub failed_saves: usize,
}

/// Valid vs. invalid entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
}

/// Dataset workflows over pluggable collaborators.
pub struct Curator<F, G, S> {
    fetcher: F,
    generator: G,
    store: S,
    checker: Option<Arc<dyn FactChecker>>,
    config: ExtractionConfig,
}

impl<F, G, S> Curator<F, G, S>
where
    F: ContentFetcher,
    G: KeyPointGenerator,
    S: DatasetStore,
{
    /// Create a curator without a fact checker.
    pub fn new(fetcher: F, generator: G, store: S) -> Self {
        Self {
            fetcher,
            generator,
            store,
            checker: None,
            config: ExtractionConfig::default(),
        }
    }

    /// Attach a fact checker.
    pub fn with_fact_checker(mut self, checker: Arc<dyn FactChecker>) -> Self {
        self.checker = Some(checker);
        self
    }

    /// Set the regeneration settings.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn has_fact_checker(&self) -> bool {
        self.checker.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch `url` and generate key points for it.
    ///
    /// Returns `Ok(None)` when generation never succeeded. With `verify` set
    /// and a fact checker attached, the entry carries verification results,
    /// reusing the regeneration loop's last check when it ran.
    pub async fn extract_from_url(&self, url: &str, verify: bool) -> Result<Option<DatasetEntry>> {
        let content = self.fetcher.extract_content(url).await?;
        info!(url = %url, chars = content.len(), "Fetched article");

        let Some(outcome) =
            generate_verified(&self.generator, self.checker.as_deref(), &content, &self.config)
                .await
        else {
            warn!(url = %url, "No key points generated");
            return Ok(None);
        };

        let verification = match (&self.checker, verify) {
            (Some(checker), true) => Some(match outcome.verification {
                Some(results) => results,
                None => aggregate(checker.as_ref(), &content, &outcome.key_points).await,
            }),
            _ => None,
        };

        let mut entry = DatasetEntry::new(content, outcome.key_points);
        entry.verification_results = verification;
        Ok(Some(entry))
    }

    /// Append an entry per URL to the dataset at `path`.
    pub async fn process_urls(
        &self,
        urls: &[String],
        path: &Path,
        options: &ProcessOptions,
    ) -> StoreResult<ProcessReport> {
        self.process_urls_with_progress(urls, path, options, |_| {})
            .await
    }

    /// [`Curator::process_urls`] with a callback invoked after each URL.
    ///
    /// The dataset is saved after every added entry, so a crash loses at
    /// most the URL in flight. Only the first save of the run backs up the
    /// previous file. Neither a failed URL nor a failed save stops the batch;
    /// after a failed save the next one still carries every added entry.
    pub async fn process_urls_with_progress<P>(
        &self,
        urls: &[String],
        path: &Path,
        options: &ProcessOptions,
        mut on_url: P,
    ) -> StoreResult<ProcessReport>
    where
        P: for<'a> FnMut(UrlProgress<'a>) + Send,
    {
        let mut dataset = self.store.load(path).await?;
        let mut report = ProcessReport::default();
        let mut backup_pending = options.backup;
        let total = urls.len();

        info!(urls = total, existing = dataset.len(), path = %path.display(), "Processing URLs");

        for (index, url) in urls.iter().enumerate() {
            let status = match self.extract_from_url(url, options.verify).await {
                Ok(Some(entry)) => {
                    dataset.add_entry(entry);
                    report.added += 1;
                    match self.store.save(&dataset, path, backup_pending).await {
                        Ok(()) => backup_pending = false,
                        Err(e) => {
                            report.failed_saves += 1;
                            error!(url = %url, entries = dataset.len(), error = %e, "Failed to save dataset");
                        }
                    }
                    UrlStatus::Added
                }
                Ok(None) => UrlStatus::Failed("no key points generated".to_string()),
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to process URL");
                    UrlStatus::Failed(e.to_string())
                }
            };

            if let UrlStatus::Failed(reason) = &status {
                report.failed.push((url.clone(), reason.clone()));
            }
            on_url(UrlProgress {
                index,
                total,
                url,
                status,
            });

            if index + 1 < total && !options.document_delay().is_zero() {
                tokio::time::sleep(options.document_delay()).await;
            }
        }

        report.total_entries = dataset.len();
        info!(
            added = report.added,
            failed = report.failed.len(),
            failed_saves = report.failed_saves,
            total_entries = report.total_entries,
            "Finished processing URLs"
        );
        Ok(report)
    }

    /// Verify the dataset at `input`, writing results to `output`.
    pub async fn verify_dataset(
        &self,
        input: &Path,
        output: &Path,
        config: &VerifyDatasetConfig,
    ) -> Result<VerificationReport> {
        self.verify_dataset_with_progress(input, output, config, |_| {})
            .await
    }

    /// [`Curator::verify_dataset`] with a per-entry progress callback.
    pub async fn verify_dataset_with_progress<P>(
        &self,
        input: &Path,
        output: &Path,
        config: &VerifyDatasetConfig,
        on_entry: P,
    ) -> Result<VerificationReport>
    where
        P: FnMut(EntryProgress) + Send,
    {
        let checker = self
            .checker
            .as_deref()
            .ok_or_else(|| KeyPointsError::Config("no fact checker configured".into()))?;

        let mut dataset = self.store.load(input).await?;
        Ok(
            verify_dataset_with_progress(checker, &mut dataset, &self.store, output, config, on_entry)
                .await,
        )
    }

    /// Strip citation markers from every entry's key points.
    ///
    /// Returns the number of entries whose key points changed.
    pub async fn clean_dataset(&self, path: &Path, backup: bool) -> StoreResult<usize> {
        let mut dataset = self.store.load(path).await?;
        let mut cleaned = 0;

        for entry in &mut dataset.entries {
            if let Some(output) = entry.output.as_mut() {
                let stripped = clean_references(output);
                if stripped != *output {
                    *output = stripped;
                    cleaned += 1;
                }
            }
        }

        self.store.save(&dataset, path, backup).await?;
        info!(entries = dataset.len(), cleaned, path = %path.display(), "Cleaned dataset");
        Ok(cleaned)
    }

    /// Count entries with and without both content and key points.
    pub async fn validate_dataset(&self, path: &Path) -> StoreResult<ValidationReport> {
        let dataset = self.store.load(path).await?;
        let (valid, invalid) = dataset.validity();
        Ok(ValidationReport {
            total: dataset.len(),
            valid,
            invalid,
        })
    }

    /// Verification statistics for the dataset at `path`.
    pub async fn dataset_stats(&self, path: &Path) -> StoreResult<DatasetStats> {
        Ok(self.store.load(path).await?.stats())
    }
}
