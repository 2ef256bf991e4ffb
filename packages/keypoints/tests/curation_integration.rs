//! Integration tests for the curation workflow against real files.
//!
//! These tests drive the full loop through the public API:
//! 1. Fetch articles and generate key points (with regeneration)
//! 2. Persist the dataset as JSON with backups
//! 3. Verify the stored dataset into a `_verified` file
//! 4. Read statistics and export ShareGPT records

use std::sync::Arc;

use keypoints::{
    verified_output_path, Curator, Dataset, DatasetEntry, DatasetStore, ExtractionConfig,
    JsonDatasetStore, MockFactChecker, MockFetcher, MockGenerator, ProcessOptions, Verdict,
    VerifyDatasetConfig, SHAREGPT_SOURCE,
};
use tempfile::TempDir;

const SKY_URL: &str = "https://news.test/sky";
const SKY_DOC: &str = "The sky is blue. The grass is green.";

fn sky_checker() -> Arc<MockFactChecker> {
    Arc::new(
        MockFactChecker::new()
            .with_response("The sky is blue", "Yes, the document states this.")
            .with_response("The sky is green", "No, the document says the sky is blue.")
            .with_response("The grass is green", "Yes"),
    )
}

fn options() -> ProcessOptions {
    ProcessOptions {
        document_delay_ms: 0,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_process_then_verify_round() {
    let dir = TempDir::new().unwrap();
    let dataset_path = dir.path().join("dataset.json");

    let generator = MockGenerator::new()
        .then_return("Here are the key points of the article:\n* The sky is green")
        .then_return("Here are the key points of the article:\n* The sky is blue\n* The grass is green");
    let checker = sky_checker();
    let curator = Curator::new(
        MockFetcher::new().with_page(SKY_URL, SKY_DOC),
        generator.clone(),
        JsonDatasetStore::new(),
    )
    .with_fact_checker(checker.clone())
    .with_config(ExtractionConfig::new().with_auto_check(true));

    let report = curator
        .process_urls(&[SKY_URL.to_string()], &dataset_path, &options())
        .await
        .unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(generator.call_count(), 2);

    let stored = JsonDatasetStore::new().load(&dataset_path).await.unwrap();
    let entry = &stored.entries[0];
    assert!(entry.output.as_deref().unwrap().contains("The sky is blue"));
    assert!(entry.verification_results.is_none());

    checker.clear_calls();
    let output = verified_output_path(&dataset_path);
    let verification = curator
        .verify_dataset(&dataset_path, &output, &VerifyDatasetConfig::default())
        .await
        .unwrap();

    assert_eq!(verification.processed, 1);
    assert_eq!(verification.stats.accurate_points, 2);
    assert_eq!(checker.calls().len(), 2);
    assert!(output.ends_with("dataset_verified.json"));

    let verified = JsonDatasetStore::new().load(&output).await.unwrap();
    let results = verified.entries[0].verification_results.as_ref().unwrap();
    assert_eq!(
        results.points(Verdict::Accurate),
        vec!["The sky is blue", "The grass is green"]
    );
}

#[tokio::test]
async fn test_persisted_json_shape() {
    let dir = TempDir::new().unwrap();
    let dataset_path = dir.path().join("dataset.json");

    let curator = Curator::new(
        MockFetcher::new().with_page(SKY_URL, SKY_DOC),
        MockGenerator::new().then_return("* The sky is blue\n* The sky is green"),
        JsonDatasetStore::new(),
    )
    .with_fact_checker(sky_checker());

    let opts = ProcessOptions {
        verify: true,
        ..options()
    };
    curator
        .process_urls(&[SKY_URL.to_string()], &dataset_path, &opts)
        .await
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&dataset_path).unwrap()).unwrap();
    let entry = &raw[0];

    assert_eq!(entry["instruction"], "");
    assert_eq!(entry["input"], SKY_DOC);
    let results = &entry["verification_results"];
    assert_eq!(results["accurate"][0]["point"], "The sky is blue");
    assert_eq!(results["accurate"][0]["verification"]["is_accurate"], true);
    assert_eq!(results["inaccurate"][0]["point"], "The sky is green");
    assert_eq!(results["inaccurate"][0]["verification"]["is_accurate"], false);
    assert!(results["uncertain"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_second_run_backs_up_previous_dataset() {
    let dir = TempDir::new().unwrap();
    let dataset_path = dir.path().join("dataset.json");
    let seed = Dataset::from_entries(vec![DatasetEntry::new("Old article", "* Old point")]);
    JsonDatasetStore::new()
        .save(&seed, &dataset_path, false)
        .await
        .unwrap();

    let curator = Curator::new(
        MockFetcher::new().with_page(SKY_URL, SKY_DOC),
        MockGenerator::new().then_return("* The sky is blue"),
        JsonDatasetStore::new(),
    );
    curator
        .process_urls(&[SKY_URL.to_string()], &dataset_path, &options())
        .await
        .unwrap();

    let backup = keypoints::backup_path(&dataset_path);
    let backed_up = JsonDatasetStore::new().load(&backup).await.unwrap();
    assert_eq!(backed_up, seed);
    assert_eq!(JsonDatasetStore::new().load(&dataset_path).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_stats_and_sharegpt_export() {
    let dir = TempDir::new().unwrap();
    let dataset_path = dir.path().join("dataset.json");
    let dataset = Dataset::from_entries(vec![
        DatasetEntry::new(SKY_DOC, "* The sky is blue\n* The sky is green"),
        DatasetEntry::new("Another article", "* Something else"),
    ]);
    JsonDatasetStore::new()
        .save(&dataset, &dataset_path, false)
        .await
        .unwrap();

    let curator = Curator::new(MockFetcher::new(), MockGenerator::new(), JsonDatasetStore::new())
        .with_fact_checker(Arc::new(
            MockFactChecker::new()
                .with_response("The sky is blue", "Yes")
                .with_response("The sky is green", "No")
                .with_default_response("Unclear"),
        ));
    curator
        .verify_dataset(&dataset_path, &dataset_path, &VerifyDatasetConfig::default())
        .await
        .unwrap();

    let stats = curator.dataset_stats(&dataset_path).await.unwrap();
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.verified_entries, 2);
    assert_eq!(stats.total_verified_points, 3);
    assert_eq!(
        (stats.accurate_points, stats.inaccurate_points, stats.uncertain_points),
        (1, 1, 1)
    );

    let exported = JsonDatasetStore::new().load(&dataset_path).await.unwrap().to_sharegpt();
    assert_eq!(exported.len(), 2);
    assert_eq!(exported[0].source, SHAREGPT_SOURCE);
    assert_eq!(exported[0].conversations[0].from, "human");
    assert_eq!(exported[0].conversations[1].from, "gpt");
}
