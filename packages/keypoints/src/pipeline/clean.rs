//! Citation stripping for generated key points.
//!
//! Generators trained on web text like to append `[1]`, `(Source: ...)` and
//! similar markers. These are removed line by line so bullet structure
//! survives for the claim splitter.

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Reference Patterns
// =============================================================================

static RE_NUMERIC_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("numeric reference regex is valid"));
static RE_SOURCE_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(Source:.*?\)").expect("source paren regex is valid"));
static RE_SOURCE_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Source:.*?\]").expect("source bracket regex is valid"));
static RE_TAG_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\w+\s*\d*\]").expect("tag reference regex is valid"));
static RE_HSPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("whitespace regex is valid"));

/// Remove citation markers from `text`.
///
/// Runs of spaces and tabs collapse to one space, and lines left empty
/// (or holding only a bare `*`) are dropped. Newlines are kept.
pub fn clean_references(text: &str) -> String {
    let mut cleaned = text.replace("\r\n", "\n");
    for re in [&RE_NUMERIC_REF, &RE_SOURCE_PAREN, &RE_SOURCE_BRACKET, &RE_TAG_REF] {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }

    cleaned
        .lines()
        .map(|line| RE_HSPACE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty() && line != "*")
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_numeric_and_source_markers() {
        let text = "* The sky is blue [1] (Source: NASA)\n* Grass is green [Source: botany.org]";
        assert_eq!(
            clean_references(text),
            "* The sky is blue\n* Grass is green"
        );
    }

    #[test]
    fn test_strips_tag_references() {
        assert_eq!(clean_references("* Point one [ref 2] continues"), "* Point one continues");
        assert_eq!(clean_references("* Point [citation]"), "* Point");
    }

    #[test]
    fn test_drops_bullets_emptied_by_cleaning() {
        let text = "Here are the key points of the article:\n* [1]\n\n*   Real   point\t here";
        assert_eq!(
            clean_references(text),
            "Here are the key points of the article:\n* Real point here"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "* Alpha\n* Beta";
        assert_eq!(clean_references(text), text);
    }

    #[test]
    fn test_parenthetical_without_source_kept() {
        assert_eq!(
            clean_references("* Revenue grew (year over year)"),
            "* Revenue grew (year over year)"
        );
    }
}
