//! Verification types - per-claim verdicts and their buckets.

use serde::{Deserialize, Serialize};

/// Outcome of checking one claim against its source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The model affirmed the claim
    Accurate,

    /// The model rejected the claim
    Inaccurate,

    /// Anything else: hedged answers, transport failures, unparseable text
    Uncertain,
}

impl Verdict {
    /// Classify a raw fact-checker response.
    ///
    /// Case-insensitive prefix match after leading whitespace: `yes` is
    /// accurate, `no` is inaccurate, everything else is uncertain.
    pub fn from_response(response: &str) -> Self {
        let text = response.trim_start();
        if starts_with_ignore_case(text, "yes") {
            Self::Accurate
        } else if starts_with_ignore_case(text, "no") {
            Self::Inaccurate
        } else {
            Self::Uncertain
        }
    }

    /// Tri-state form used in the persisted JSON.
    pub fn is_accurate(self) -> Option<bool> {
        match self {
            Self::Accurate => Some(true),
            Self::Inaccurate => Some(false),
            Self::Uncertain => None,
        }
    }

    /// Inverse of [`Verdict::is_accurate`].
    pub fn from_is_accurate(is_accurate: Option<bool>) -> Self {
        match is_accurate {
            Some(true) => Self::Accurate,
            Some(false) => Self::Inaccurate,
            None => Self::Uncertain,
        }
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accurate => f.write_str("accurate"),
            Self::Inaccurate => f.write_str("inaccurate"),
            Self::Uncertain => f.write_str("uncertain"),
        }
    }
}

/// Result of verifying a single key point.
///
/// Field names and the tri-state `is_accurate` match the dataset JSON, so
/// files written by earlier tooling load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerificationResult {
    /// `true` accurate, `false` inaccurate, `null` uncertain
    #[serde(default)]
    pub is_accurate: Option<bool>,

    /// Model text, or a description of why verification failed
    #[serde(default)]
    pub explanation: String,

    /// Raw model response; absent when no response was obtained
    #[serde(default)]
    pub raw_response: Option<String>,
}

impl VerificationResult {
    /// Build a result from a fact-checker response.
    pub fn from_response(response: impl Into<String>) -> Self {
        let response = response.into();
        Self {
            is_accurate: Verdict::from_response(&response).is_accurate(),
            explanation: response.clone(),
            raw_response: Some(response),
        }
    }

    /// Build an uncertain result for a claim that could not be checked.
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        Self {
            is_accurate: None,
            explanation: format!("Error: {}", reason),
            raw_response: None,
        }
    }

    /// The verdict this result encodes.
    pub fn verdict(&self) -> Verdict {
        Verdict::from_is_accurate(self.is_accurate)
    }
}

/// A key point paired with its verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedPoint {
    pub point: String,
    #[serde(default)]
    pub verification: VerificationResult,
}

/// Verification results for all key points of one summary.
///
/// Each bucket keeps claim extraction order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerificationResults {
    #[serde(default)]
    pub accurate: Vec<VerifiedPoint>,

    #[serde(default)]
    pub inaccurate: Vec<VerifiedPoint>,

    #[serde(default)]
    pub uncertain: Vec<VerifiedPoint>,
}

impl VerificationResults {
    /// Create empty results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a verified point to the bucket its verdict selects.
    pub fn push(&mut self, point: impl Into<String>, verification: VerificationResult) {
        let entry = VerifiedPoint {
            point: point.into(),
            verification,
        };
        match entry.verification.verdict() {
            Verdict::Accurate => self.accurate.push(entry),
            Verdict::Inaccurate => self.inaccurate.push(entry),
            Verdict::Uncertain => self.uncertain.push(entry),
        }
    }

    /// Total number of verified points across all buckets.
    pub fn len(&self) -> usize {
        self.accurate.len() + self.inaccurate.len() + self.uncertain.len()
    }

    /// True when nothing was verified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when at least one point was rejected.
    pub fn has_inaccuracies(&self) -> bool {
        !self.inaccurate.is_empty()
    }

    /// Points in a given bucket.
    pub fn bucket(&self, verdict: Verdict) -> &[VerifiedPoint] {
        match verdict {
            Verdict::Accurate => &self.accurate,
            Verdict::Inaccurate => &self.inaccurate,
            Verdict::Uncertain => &self.uncertain,
        }
    }

    /// Point texts of a bucket, in order.
    pub fn points(&self, verdict: Verdict) -> Vec<&str> {
        self.bucket(verdict).iter().map(|p| p.point.as_str()).collect()
    }
}
