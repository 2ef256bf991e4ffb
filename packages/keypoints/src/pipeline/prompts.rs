//! LLM prompts for key-point generation and claim verification.

use std::borrow::Cow;

/// System prompt for key-point generation.
///
/// The preamble and `*` bullets are what [`split_claims`] expects.
///
/// [`split_claims`]: super::claims::split_claims
pub const GENERATE_KEY_POINTS_PROMPT: &str = "Extract and list only the key points from the given article in a precise manner. \
Format the response as a bullet point list starting with 'Here are the key points of the article:'. \
Each point should start with an asterisk (*). \
Make it concise and focused on the main information. \
Do not include any references, citations, or source markers.";

/// Longest document, in characters, sent to the fact checker.
pub const MAX_DOCUMENT_CHARS: usize = 6000;

/// Appended to a document that was cut to fit the context window.
pub const TRUNCATION_MARKER: &str = "...";

/// Format the single-turn fact-check prompt.
///
/// MiniCheck-style models are trained on exactly this
/// `Document: / Claim:` layout and answer "Yes" or "No".
pub fn format_fact_check_prompt(document: &str, claim: &str) -> String {
    format!(
        "Document: {}\n\nClaim: {}\n\nIs this claim consistent with the document?",
        document, claim
    )
}

/// Cut `document` to at most `max_chars` characters, ending in
/// [`TRUNCATION_MARKER`] when anything was removed and the marker fits.
pub fn truncate_document(document: &str, max_chars: usize) -> Cow<'_, str> {
    if document.chars().count() <= max_chars {
        return Cow::Borrowed(document);
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    let char_boundary = |n: usize| {
        document
            .char_indices()
            .nth(n)
            .map(|(idx, _)| idx)
            .unwrap_or(document.len())
    };

    if max_chars <= marker_len {
        return Cow::Owned(document[..char_boundary(max_chars)].to_string());
    }

    let cut = char_boundary(max_chars - marker_len);

    let head = &document[..cut];
    if head.ends_with(TRUNCATION_MARKER) {
        Cow::Owned(head.to_string())
    } else {
        Cow::Owned(format!("{}{}", head, TRUNCATION_MARKER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_document_untouched() {
        let doc = "The sky is blue. The grass is green.";
        assert!(matches!(truncate_document(doc, MAX_DOCUMENT_CHARS), Cow::Borrowed(d) if d == doc));
    }

    #[test]
    fn test_exact_length_untouched() {
        let doc = "a".repeat(MAX_DOCUMENT_CHARS);
        assert_eq!(truncate_document(&doc, MAX_DOCUMENT_CHARS).len(), MAX_DOCUMENT_CHARS);
    }

    #[test]
    fn test_long_document_truncated_with_marker() {
        let doc = "word ".repeat(2_000);
        let sent = truncate_document(&doc, MAX_DOCUMENT_CHARS);

        assert!(sent.chars().count() <= MAX_DOCUMENT_CHARS);
        assert!(sent.ends_with(TRUNCATION_MARKER));
        assert_eq!(sent.chars().count(), MAX_DOCUMENT_CHARS);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let doc = "ü".repeat(MAX_DOCUMENT_CHARS + 10);
        let sent = truncate_document(&doc, MAX_DOCUMENT_CHARS);

        assert_eq!(sent.chars().count(), MAX_DOCUMENT_CHARS);
        assert!(sent.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_existing_marker_not_doubled() {
        let mut doc = "x".repeat(MAX_DOCUMENT_CHARS - 6);
        doc.push_str("...more text here");
        let sent = truncate_document(&doc, MAX_DOCUMENT_CHARS);

        assert!(sent.ends_with("..."));
        assert!(!sent.ends_with("......"));
        assert!(sent.chars().count() <= MAX_DOCUMENT_CHARS);
    }

    #[test]
    fn test_tiny_limit_never_exceeded() {
        let doc = "The sky is blue.";

        assert_eq!(truncate_document(doc, 0), "");
        assert_eq!(truncate_document(doc, 2), "Th");
        assert_eq!(truncate_document(doc, 3), "The");
        assert_eq!(truncate_document(doc, 4), "T...");
    }

    #[test]
    fn test_fact_check_prompt_layout() {
        let prompt = format_fact_check_prompt("Doc text", "A claim");
        assert_eq!(
            prompt,
            "Document: Doc text\n\nClaim: A claim\n\nIs this claim consistent with the document?"
        );
    }
}
