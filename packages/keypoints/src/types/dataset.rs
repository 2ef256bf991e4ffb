//! Dataset types - entries, statistics and the ShareGPT export format.

use serde::{Deserialize, Serialize};

use super::verification::VerificationResults;

/// Source tag written into every ShareGPT record.
pub const SHAREGPT_SOURCE: &str = "article-key-points";

/// One training example: article content and the key points extracted from it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetEntry {
    /// Optional instruction for the model
    #[serde(default)]
    pub instruction: String,

    /// The original article content
    #[serde(default)]
    pub input: String,

    /// The extracted key points
    #[serde(default)]
    pub output: Option<String>,

    /// Latest verification pass; replaced wholesale on re-verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_results: Option<VerificationResults>,
}

impl DatasetEntry {
    /// Create an entry from content and key points.
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            instruction: String::new(),
            input: input.into(),
            output: Some(output.into()),
            verification_results: None,
        }
    }

    /// Set the instruction.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Attach verification results.
    pub fn with_verification(mut self, results: VerificationResults) -> Self {
        self.verification_results = Some(results);
        self
    }

    /// Document and key points, when both are present and non-blank.
    pub fn verifiable_parts(&self) -> Option<(&str, &str)> {
        let output = self.output.as_deref()?;
        if self.input.trim().is_empty() || output.trim().is_empty() {
            return None;
        }
        Some((self.input.as_str(), output))
    }

    /// An entry is valid for training when it has both content and key points.
    pub fn is_valid(&self) -> bool {
        self.verifiable_parts().is_some()
    }
}

/// An ordered collection of dataset entries.
///
/// Serializes as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    pub entries: Vec<DatasetEntry>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dataset from entries.
    pub fn from_entries(entries: Vec<DatasetEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry.
    pub fn add_entry(&mut self, entry: DatasetEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compute verification statistics over all entries.
    pub fn stats(&self) -> DatasetStats {
        let mut stats = DatasetStats {
            total_entries: self.entries.len(),
            ..Default::default()
        };

        for results in self.entries.iter().filter_map(|e| e.verification_results.as_ref()) {
            stats.verified_entries += 1;
            stats.accurate_points += results.accurate.len();
            stats.inaccurate_points += results.inaccurate.len();
            stats.uncertain_points += results.uncertain.len();
        }

        stats.total_verified_points =
            stats.accurate_points + stats.inaccurate_points + stats.uncertain_points;
        stats
    }

    /// Count entries that are valid (content and key points) vs. not.
    pub fn validity(&self) -> (usize, usize) {
        let valid = self.entries.iter().filter(|e| e.is_valid()).count();
        (valid, self.entries.len() - valid)
    }

    /// Convert to ShareGPT conversation records for fine-tuning.
    pub fn to_sharegpt(&self) -> Vec<ShareGptRecord> {
        self.entries.iter().map(ShareGptRecord::from_entry).collect()
    }
}

/// Dataset-level verification statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_entries: usize,
    pub verified_entries: usize,
    pub total_verified_points: usize,
    pub accurate_points: usize,
    pub inaccurate_points: usize,
    pub uncertain_points: usize,
}

impl DatasetStats {
    /// Fraction of entries that carry verification results (0.0 when empty).
    pub fn verified_fraction(&self) -> f64 {
        ratio(self.verified_entries, self.total_entries)
    }

    /// Fraction of verified points judged accurate (0.0 when none).
    pub fn accuracy_rate(&self) -> f64 {
        ratio(self.accurate_points, self.total_verified_points)
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// One turn of a ShareGPT conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareGptTurn {
    /// "human" or "gpt"
    pub from: String,
    pub value: String,
}

impl ShareGptTurn {
    fn human(value: impl Into<String>) -> Self {
        Self {
            from: "human".to_string(),
            value: value.into(),
        }
    }

    fn gpt(value: impl Into<String>) -> Self {
        Self {
            from: "gpt".to_string(),
            value: value.into(),
        }
    }
}

/// A dataset entry in ShareGPT format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareGptRecord {
    pub conversations: Vec<ShareGptTurn>,
    pub source: String,
}

impl ShareGptRecord {
    /// Convert one entry. A non-blank instruction becomes its own human turn.
    pub fn from_entry(entry: &DatasetEntry) -> Self {
        let mut conversations = Vec::with_capacity(3);
        if !entry.instruction.trim().is_empty() {
            conversations.push(ShareGptTurn::human(&entry.instruction));
        }
        conversations.push(ShareGptTurn::human(&entry.input));
        conversations.push(ShareGptTurn::gpt(entry.output.clone().unwrap_or_default()));

        Self {
            conversations,
            source: SHAREGPT_SOURCE.to_string(),
        }
    }
}
