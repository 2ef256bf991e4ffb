//! Claim splitting - turn a generated summary into checkable claims.
//!
//! Generation does not reliably follow the bulleted format, so splitting
//! degrades in two tiers instead of failing:
//! 1. one claim per non-empty bullet line, minus the preamble line
//! 2. one claim per sentence of the whole text
//!
//! An empty result means there is nothing to verify.

use tracing::{debug, warn};

/// Opening line the generator is asked to emit before the bullets.
pub const KEY_POINTS_PREAMBLE: &str = "Here are the key points";

/// Bullet marker stripped from the start of each line.
const BULLET: char = '*';

/// Split a key-point summary into ordered, non-empty claims.
pub fn split_claims(summary: &str) -> Vec<String> {
    let bullets = split_bullets(summary);
    if !bullets.is_empty() {
        return bullets;
    }

    warn!("No bullet points found in key points; expected '* Point 1\\n* Point 2'");

    let sentences = split_sentences(summary);
    if sentences.is_empty() {
        warn!("No sentences found either; nothing to verify");
    } else {
        debug!(count = sentences.len(), "Falling back to sentence claims");
    }
    sentences
}

/// Tier 1: one claim per bullet line.
pub fn split_bullets(summary: &str) -> Vec<String> {
    summary
        .lines()
        .map(|line| line.trim().trim_start_matches(BULLET).trim())
        .filter(|line| !line.is_empty() && !line.starts_with(KEY_POINTS_PREAMBLE))
        .map(str::to_string)
        .collect()
}

/// Tier 2: split on whitespace that follows `.`, `!` or `?`.
///
/// Pieces without any alphanumeric character (stray bullets, lone
/// punctuation) are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut in_break = false;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if !in_break && matches!(prev, Some('.' | '!' | '?')) {
                push_trimmed(&mut sentences, &text[start..idx]);
                in_break = true;
            }
        } else if in_break {
            start = idx;
            in_break = false;
        }
        prev = Some(ch);
    }

    if !in_break {
        push_trimmed(&mut sentences, &text[start..]);
    }
    sentences
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if piece.chars().any(char::is_alphanumeric) {
        out.push(piece.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullets_with_preamble() {
        let summary = "Here are the key points of the article:\n* The sky is blue\n*   Grass is green  \n\n* Water is wet";
        assert_eq!(
            split_claims(summary),
            vec!["The sky is blue", "Grass is green", "Water is wet"]
        );
    }

    #[test]
    fn test_unbulleted_lines_are_claims() {
        let summary = "First point\nSecond point";
        assert_eq!(split_claims(summary), vec!["First point", "Second point"]);
    }

    #[test]
    fn test_repeated_markers_and_crlf() {
        let summary = "** Bold point\r\n*\r\n* Next";
        assert_eq!(split_claims(summary), vec!["Bold point", "Next"]);
    }

    #[test]
    fn test_sentence_fallback_when_only_preamble() {
        let summary = "Here are the key points of the article: The sky is blue. Grass is green!  Is water wet?";
        assert_eq!(
            split_claims(summary),
            vec![
                "Here are the key points of the article: The sky is blue.",
                "Grass is green!",
                "Is water wet?"
            ]
        );
    }

    #[test]
    fn test_blank_summary_yields_nothing() {
        assert!(split_claims("").is_empty());
        assert!(split_claims("  \n\t\n ").is_empty());
        assert!(split_claims("*\n* \n").is_empty());
    }

    #[test]
    fn test_split_sentences_requires_trailing_whitespace() {
        assert_eq!(split_sentences("no terminal punctuation"), vec!["no terminal punctuation"]);
        assert_eq!(split_sentences("3.14 is pi. Yes."), vec!["3.14 is pi.", "Yes."]);
    }

    #[test]
    fn test_split_sentences_multiline() {
        assert_eq!(split_sentences("One.\n\nTwo?\tThree"), vec!["One.", "Two?", "Three"]);
    }
}
