//! Dataset verification driver.
//!
//! Walks a loaded dataset in order, replaces each eligible entry's
//! verification results, and checkpoints the whole dataset to the store so
//! an interrupted run loses at most one checkpoint interval of work.

use std::path::Path;

use tracing::{error, info, warn};

use crate::pipeline::verify::aggregate;
use crate::traits::ai::FactChecker;
use crate::traits::store::DatasetStore;
use crate::types::config::VerifyDatasetConfig;
use crate::types::dataset::{Dataset, DatasetStats};

/// What happened to one entry during a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Checked; counts per bucket
    Verified {
        accurate: usize,
        inaccurate: usize,
        uncertain: usize,
    },

    /// Checked, but the output held no claims
    NoClaims,

    /// Missing content or key points
    Skipped,
}

/// Progress notification sent after each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryProgress {
    /// Zero-based position in the dataset
    pub index: usize,
    pub total: usize,
    pub status: EntryStatus,
}

/// Summary of a verification run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationReport {
    /// Entries that were sent to the fact checker
    pub processed: usize,

    /// Processed entries that yielded at least one claim
    pub verified: usize,

    /// Processed entries with no extractable claims
    pub no_claims: usize,

    /// Entries missing content or key points
    pub skipped: usize,

    /// Successful checkpoint writes
    pub saves: usize,

    /// Checkpoint writes that failed
    pub failed_saves: usize,

    /// Dataset totals after the run
    pub stats: DatasetStats,
}

/// Verify every entry of `dataset`, persisting to `output` as it goes.
pub async fn verify_dataset<C, S>(
    checker: &C,
    dataset: &mut Dataset,
    store: &S,
    output: &Path,
    config: &VerifyDatasetConfig,
) -> VerificationReport
where
    C: FactChecker + ?Sized,
    S: DatasetStore + ?Sized,
{
    verify_dataset_with_progress(checker, dataset, store, output, config, |_| {}).await
}

/// [`verify_dataset`] with a callback invoked after each entry.
///
/// The dataset is saved after every `checkpoint_every`-th entry and after
/// the last one. Save failures are logged and counted; the in-memory
/// results stay intact for the next checkpoint.
pub async fn verify_dataset_with_progress<C, S, F>(
    checker: &C,
    dataset: &mut Dataset,
    store: &S,
    output: &Path,
    config: &VerifyDatasetConfig,
    mut on_entry: F,
) -> VerificationReport
where
    C: FactChecker + ?Sized,
    S: DatasetStore + ?Sized,
    F: FnMut(EntryProgress) + Send,
{
    let total = dataset.len();
    let checkpoint_every = config.checkpoint_every.max(1);
    let mut report = VerificationReport::default();
    let mut backup_pending = config.backup;

    info!(entries = total, output = %output.display(), "Verifying dataset");

    for index in 0..total {
        let status = verify_entry(checker, dataset, index).await;
        match status {
            EntryStatus::Verified { .. } => {
                report.processed += 1;
                report.verified += 1;
            }
            EntryStatus::NoClaims => {
                report.processed += 1;
                report.no_claims += 1;
            }
            EntryStatus::Skipped => report.skipped += 1,
        }
        on_entry(EntryProgress { index, total, status });

        let position = index + 1;
        if position % checkpoint_every == 0 || position == total {
            match store.save(dataset, output, backup_pending).await {
                Ok(()) => {
                    report.saves += 1;
                    backup_pending = false;
                    info!(entries = position, path = %output.display(), "Saved progress");
                }
                Err(e) => {
                    report.failed_saves += 1;
                    error!(entries = position, error = %e, "Failed to save progress");
                }
            }
        }

        if position < total && !config.document_delay().is_zero() {
            tokio::time::sleep(config.document_delay()).await;
        }
    }

    report.stats = dataset.stats();
    info!(
        processed = report.processed,
        skipped = report.skipped,
        accurate = report.stats.accurate_points,
        inaccurate = report.stats.inaccurate_points,
        uncertain = report.stats.uncertain_points,
        "Dataset verification complete"
    );
    report
}

async fn verify_entry<C>(checker: &C, dataset: &mut Dataset, index: usize) -> EntryStatus
where
    C: FactChecker + ?Sized,
{
    let Some((document, key_points)) = dataset.entries[index].verifiable_parts() else {
        warn!(entry = index + 1, "Entry is missing content or key points, skipping");
        return EntryStatus::Skipped;
    };

    let results = aggregate(checker, document, key_points).await;
    let status = if results.is_empty() {
        warn!(entry = index + 1, "No points were extracted for verification");
        EntryStatus::NoClaims
    } else {
        EntryStatus::Verified {
            accurate: results.accurate.len(),
            inaccurate: results.inaccurate.len(),
            uncertain: results.uncertain.len(),
        }
    };

    dataset.entries[index].verification_results = Some(results);
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::memory::MemoryDatasetStore;
    use crate::testing::MockFactChecker;
    use crate::types::dataset::DatasetEntry;
    use crate::types::verification::{VerificationResult, VerificationResults};
    use std::path::PathBuf;

    fn entries(n: usize) -> Dataset {
        Dataset::from_entries(
            (0..n)
                .map(|i| DatasetEntry::new(format!("Article {}", i), format!("* Point {}", i)))
                .collect(),
        )
    }

    fn output() -> PathBuf {
        PathBuf::from("dataset_verified.json")
    }

    #[tokio::test]
    async fn test_twelve_entries_checkpoint_at_5_10_12() {
        let checker = MockFactChecker::new().with_default_response("Yes");
        let store = MemoryDatasetStore::new();
        let mut dataset = entries(12);

        let report = verify_dataset(
            &checker,
            &mut dataset,
            &store,
            &output(),
            &VerifyDatasetConfig::default(),
        )
        .await;

        let saves = store.saves();
        assert_eq!(report.saves, 3);
        assert_eq!(saves.len(), 3);

        let verified_at_save: Vec<usize> = saves
            .iter()
            .map(|s| s.dataset.stats().verified_entries)
            .collect();
        assert_eq!(verified_at_save, vec![5, 10, 12]);
        assert!(saves.iter().all(|s| s.path == output()));
    }

    #[tokio::test]
    async fn test_backup_requested_on_first_save_only() {
        let checker = MockFactChecker::new().with_default_response("Yes");
        let store = MemoryDatasetStore::new();
        let mut dataset = entries(7);

        verify_dataset(
            &checker,
            &mut dataset,
            &store,
            &output(),
            &VerifyDatasetConfig::default(),
        )
        .await;

        let backups: Vec<bool> = store.saves().iter().map(|s| s.backup).collect();
        assert_eq!(backups, vec![true, false]);
    }

    #[tokio::test]
    async fn test_incomplete_entries_are_skipped() {
        let checker = MockFactChecker::new().with_default_response("No");
        let store = MemoryDatasetStore::new();
        let mut dataset = Dataset::from_entries(vec![
            DatasetEntry::new("Article", "* Claim"),
            DatasetEntry {
                input: "Article without key points".into(),
                ..Default::default()
            },
            DatasetEntry::new("", "* Orphan claim"),
        ]);

        let mut seen = Vec::new();
        let report = verify_dataset_with_progress(
            &checker,
            &mut dataset,
            &store,
            &output(),
            &VerifyDatasetConfig::default(),
            |p| seen.push(p.status),
        )
        .await;

        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.stats.inaccurate_points, 1);
        assert!(dataset.entries[1].verification_results.is_none());
        assert_eq!(seen[1], EntryStatus::Skipped);
        assert_eq!(checker.calls().len(), 1);
        assert_eq!(store.saves().len(), 1);
    }

    #[tokio::test]
    async fn test_prior_results_are_replaced() {
        let checker = MockFactChecker::new().with_default_response("Yes");
        let store = MemoryDatasetStore::new();

        let mut stale = VerificationResults::new();
        stale.push("Old claim", VerificationResult::from_response("No"));
        stale.push("Another old claim", VerificationResult::from_response("No"));
        let mut dataset = Dataset::from_entries(vec![
            DatasetEntry::new("Article", "* New claim").with_verification(stale),
        ]);

        verify_dataset(
            &checker,
            &mut dataset,
            &store,
            &output(),
            &VerifyDatasetConfig::default(),
        )
        .await;

        let results = dataset.entries[0].verification_results.as_ref().unwrap();
        assert_eq!(results.len(), 1);
        assert!(results.inaccurate.is_empty());
        assert_eq!(results.accurate[0].point, "New claim");
    }

    #[tokio::test]
    async fn test_save_failure_is_not_fatal() {
        let checker = MockFactChecker::new().with_default_response("Yes");
        let store = MemoryDatasetStore::new().with_failing_saves();
        let mut dataset = entries(6);

        let report = verify_dataset(
            &checker,
            &mut dataset,
            &store,
            &output(),
            &VerifyDatasetConfig::default(),
        )
        .await;

        assert_eq!(report.processed, 6);
        assert_eq!(report.saves, 0);
        assert_eq!(report.failed_saves, 2);
        assert_eq!(report.stats.verified_entries, 6);
    }

    #[tokio::test]
    async fn test_no_claims_counted_separately() {
        let checker = MockFactChecker::new();
        let store = MemoryDatasetStore::new();
        let mut dataset = Dataset::from_entries(vec![DatasetEntry::new("Article", "* ")]);

        let report = verify_dataset(
            &checker,
            &mut dataset,
            &store,
            &output(),
            &VerifyDatasetConfig::default(),
        )
        .await;

        assert_eq!(report.no_claims, 1);
        assert_eq!(report.verified, 0);
        assert_eq!(report.stats.verified_entries, 1);
        assert_eq!(report.stats.total_verified_points, 0);
    }

    #[tokio::test]
    async fn test_empty_dataset_never_saves() {
        let checker = MockFactChecker::new();
        let store = MemoryDatasetStore::new();
        let mut dataset = Dataset::new();

        let report = verify_dataset(
            &checker,
            &mut dataset,
            &store,
            &output(),
            &VerifyDatasetConfig::default(),
        )
        .await;

        assert_eq!(report, VerificationReport::default());
        assert!(store.saves().is_empty());
    }
}
