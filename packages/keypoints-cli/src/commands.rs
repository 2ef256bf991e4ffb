//! Command handlers shared by the subcommands and the interactive menu.

use anyhow::{bail, Context, Result};
use keypoints::ai::{MiniCheckVerifier, OpenAiGenerator};
use keypoints::fetchers::validate_url;
use keypoints::{
    verified_output_path, Curator, Dataset, DatasetStats, EntryStatus, HttpFetcher,
    JsonDatasetStore, UrlStatus, VerifyDatasetConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::api_key::ensure_api_key;
use crate::context::AppContext;
use crate::progress::Progress;

type LiveCurator = Curator<HttpFetcher, OpenAiGenerator, JsonDatasetStore>;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProcessArgs {
    pub urls: Vec<String>,
    pub file: Option<PathBuf>,
    pub dataset: Option<PathBuf>,
    pub verify: bool,
    pub auto_check: bool,
    pub max_attempts: Option<u32>,
    pub no_backup: bool,
}

#[derive(Debug, Clone, Default)]
pub struct VerifyArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub no_backup: bool,
    pub checkpoint_every: Option<usize>,
}

// =============================================================================
// Wiring
// =============================================================================

fn build_curator(ctx: &AppContext, with_checker: bool) -> Result<LiveCurator> {
    let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;
    let generator = OpenAiGenerator::from_config(&ctx.settings.generator);
    let mut curator = Curator::new(fetcher, generator, JsonDatasetStore::new())
        .with_config(ctx.settings.extraction);

    if with_checker {
        let checker = MiniCheckVerifier::from_config(&ctx.settings.fact_check);
        info!(model = %checker.model(), url = %ctx.settings.fact_check.base_url, "Fact checker enabled");
        curator = curator.with_fact_checker(Arc::new(checker));
    }
    Ok(curator)
}

/// Read a dataset that must already exist.
async fn read_existing(path: &Path) -> Result<Dataset> {
    match JsonDatasetStore::new().read(path).await? {
        Some(dataset) => Ok(dataset),
        None => bail!("Dataset not found: {}", path.display()),
    }
}

// =============================================================================
// Process
// =============================================================================

pub async fn process(ctx: &mut AppContext, args: ProcessArgs) -> Result<()> {
    let mut candidates = args.urls.clone();
    if let Some(file) = &args.file {
        let content = fs::read_to_string(file)
            .with_context(|| format!("Failed to read URL file {}", file.display()))?;
        candidates.extend(parse_url_file(&content));
    }

    let (urls, rejected) = partition_urls(candidates);
    for url in &rejected {
        ctx.print_warning(&format!("Skipping invalid URL: {}", url));
    }
    if urls.is_empty() {
        bail!("No valid URLs to process");
    }

    ensure_api_key(ctx)?;

    let mut extraction = ctx.settings.extraction;
    if args.auto_check {
        extraction.auto_check_enabled = true;
    }
    if let Some(max) = args.max_attempts {
        extraction.max_regeneration_attempts = max;
    }
    ctx.settings.extraction = extraction;

    let mut options = ctx.settings.process;
    options.verify |= args.verify;
    if args.no_backup {
        options.backup = false;
    }

    let dataset = ctx.dataset_or_default(args.dataset);
    let curator = build_curator(ctx, options.verify || extraction.auto_check_enabled)?;

    ctx.print_header(&format!("Processing {} URL(s) into {}", urls.len(), dataset.display()));
    if extraction.auto_check_enabled {
        ctx.print_info(&format!(
            "Auto-check on: up to {} regeneration(s) per article",
            extraction.max_regeneration_attempts
        ));
    }

    let progress = Progress::bar(urls.len() as u64, "Fetching", ctx.quiet);
    let report = curator
        .process_urls_with_progress(&urls, &dataset, &options, |update| {
            progress.inc(1);
            match &update.status {
                UrlStatus::Added => progress.println(&format!("  ✓ {}", update.url)),
                UrlStatus::Failed(reason) => {
                    progress.println(&format!("  ✗ {}: {}", update.url, reason))
                }
            }
        })
        .await?;
    progress.finish_clear();

    ctx.print_success(&format!(
        "Added {} entr{} ({} total in dataset)",
        report.added,
        if report.added == 1 { "y" } else { "ies" },
        report.total_entries
    ));
    if !report.failed.is_empty() {
        ctx.print_warning(&format!("{} URL(s) failed", report.failed.len()));
    }
    if report.failed_saves > 0 {
        ctx.print_warning(&format!(
            "{} save(s) failed; {} may be missing new entries",
            report.failed_saves,
            dataset.display()
        ));
    }
    Ok(())
}

/// URLs from a text file: one per line, blank lines and `#` comments skipped.
pub fn parse_url_file(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Split candidates into fetchable URLs and rejects, dropping duplicates.
pub fn partition_urls(candidates: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut valid: Vec<String> = Vec::new();
    let mut rejected = Vec::new();

    for url in candidates {
        let url = url.trim().to_string();
        if validate_url(&url).is_err() {
            rejected.push(url);
        } else if !valid.contains(&url) {
            valid.push(url);
        }
    }
    (valid, rejected)
}

// =============================================================================
// Verify
// =============================================================================

pub async fn verify(ctx: &AppContext, args: VerifyArgs) -> Result<()> {
    let input = ctx.dataset_or_default(args.input);
    let output = args.output.unwrap_or_else(|| verified_output_path(&input));

    let mut config: VerifyDatasetConfig = ctx.settings.verify;
    if args.no_backup {
        config.backup = false;
    }
    if let Some(every) = args.checkpoint_every {
        config.checkpoint_every = every;
    }

    let total = read_existing(&input).await?.len();
    ctx.print_header(&format!(
        "Verifying {} entr{} with {}",
        total,
        if total == 1 { "y" } else { "ies" },
        ctx.settings.fact_check.model
    ));
    ctx.print_info(&format!("Results will be written to {}", output.display()));

    let curator = build_curator(ctx, true)?;
    let progress = Progress::bar(total as u64, "Verifying", ctx.quiet);
    let report = curator
        .verify_dataset_with_progress(&input, &output, &config, |update| {
            progress.inc(1);
            let message = match update.status {
                EntryStatus::Verified {
                    accurate,
                    inaccurate,
                    uncertain,
                } => format!("✓{} ✗{} ?{}", accurate, inaccurate, uncertain),
                EntryStatus::NoClaims => "no claims".to_string(),
                EntryStatus::Skipped => "skipped".to_string(),
            };
            progress.set_message(&message);
        })
        .await?;
    progress.finish_clear();

    ctx.print_success(&format!(
        "Verified {} of {} entries ({} without claims, {} skipped)",
        report.verified, total, report.no_claims, report.skipped
    ));
    if report.failed_saves > 0 {
        ctx.print_warning(&format!(
            "{} checkpoint save(s) failed; check {}",
            report.failed_saves,
            output.display()
        ));
    }
    print_stats(ctx, &report.stats);
    Ok(())
}

// =============================================================================
// Dataset maintenance
// =============================================================================

pub async fn clean(ctx: &AppContext, dataset: Option<PathBuf>, no_backup: bool) -> Result<()> {
    let path = ctx.dataset_or_default(dataset);
    read_existing(&path).await?;

    let curator = build_curator(ctx, false)?;
    let spinner = Progress::spinner("Cleaning key points", ctx.quiet);
    let cleaned = curator.clean_dataset(&path, !no_backup).await?;
    spinner.finish_ok("Done");

    ctx.print_success(&format!(
        "Cleaned {} entr{} in {}",
        cleaned,
        if cleaned == 1 { "y" } else { "ies" },
        path.display()
    ));
    Ok(())
}

pub async fn validate(ctx: &AppContext, dataset: Option<PathBuf>) -> Result<()> {
    let path = ctx.dataset_or_default(dataset);
    read_existing(&path).await?;

    let report = build_curator(ctx, false)?.validate_dataset(&path).await?;

    ctx.print_header(&format!("Dataset: {}", path.display()));
    println!("  Total entries:   {}", report.total);
    println!("  Valid entries:   {}", report.valid);
    println!("  Invalid entries: {}", report.invalid);
    if report.invalid > 0 {
        ctx.print_warning("Some entries are missing content or key points");
    } else {
        ctx.print_success("All entries are valid");
    }
    Ok(())
}

pub async fn stats(ctx: &AppContext, dataset: Option<PathBuf>) -> Result<()> {
    let path = ctx.dataset_or_default(dataset);
    read_existing(&path).await?;

    let stats = build_curator(ctx, false)?.dataset_stats(&path).await?;
    ctx.print_header(&format!("Dataset: {}", path.display()));
    print_stats(ctx, &stats);
    Ok(())
}

fn print_stats(ctx: &AppContext, stats: &DatasetStats) {
    if ctx.quiet {
        return;
    }
    println!("  Entries:          {}", stats.total_entries);
    println!(
        "  Verified entries: {} ({:.1}%)",
        stats.verified_entries,
        stats.verified_fraction() * 100.0
    );
    println!("  Verified points:  {}", stats.total_verified_points);
    println!(
        "    accurate:       {} ({:.1}%)",
        stats.accurate_points,
        stats.accuracy_rate() * 100.0
    );
    println!("    inaccurate:     {}", stats.inaccurate_points);
    println!("    uncertain:      {}", stats.uncertain_points);
}

// =============================================================================
// Convert
// =============================================================================

pub async fn convert(ctx: &AppContext, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let input = ctx.dataset_or_default(input);
    let output = output.unwrap_or_else(|| sharegpt_output_path(&input));

    let dataset = read_existing(&input).await?;
    let records = dataset.to_sharegpt();
    let json = serde_json::to_string_pretty(&records)?;
    fs::write(&output, json).with_context(|| format!("Failed to write {}", output.display()))?;

    ctx.print_success(&format!(
        "Converted {} entr{} to ShareGPT format: {}",
        records.len(),
        if records.len() == 1 { "y" } else { "ies" },
        output.display()
    ));
    Ok(())
}

/// `data.json` → `data_sharegpt.json` next to the input.
pub fn sharegpt_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    input.with_file_name(format!("{stem}_sharegpt.json"))
}
