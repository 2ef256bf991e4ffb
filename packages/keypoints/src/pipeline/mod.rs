//! Verification pipeline - the core of the library.
//!
//! The pipeline covers:
//! - Claim splitting (bullets, then sentences)
//! - Per-summary verification and bucketing
//! - The regenerate-and-reverify loop
//! - Dataset-wide verification with checkpointing
//! - Curation workflows (extract, process, verify, clean, validate)

pub mod claims;
pub mod clean;
pub mod curator;
pub mod dataset;
pub mod prompts;
pub mod regenerate;
pub mod verify;

pub use claims::{split_bullets, split_claims, split_sentences, KEY_POINTS_PREAMBLE};
pub use clean::clean_references;
pub use curator::{Curator, ProcessReport, UrlProgress, UrlStatus, ValidationReport};
pub use dataset::{
    verify_dataset, verify_dataset_with_progress, EntryProgress, EntryStatus, VerificationReport,
};
pub use prompts::{
    format_fact_check_prompt, truncate_document, GENERATE_KEY_POINTS_PROMPT, MAX_DOCUMENT_CHARS,
    TRUNCATION_MARKER,
};
pub use regenerate::{generate_verified, RegenerationOutcome};
pub use verify::aggregate;
