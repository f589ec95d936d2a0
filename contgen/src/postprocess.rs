//! Continuation post-processing
//!
//! Generated text is normalized and clipped to the last complete sentence
//! before it reaches the output buffer or the length statistics.

/// Collapse whitespace runs to single spaces and trim the ends.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to the last complete sentence.
///
/// Finds the rightmost occurrence among `.`, `?`, and `!` (a single
/// maximum across all three, not per-kind) and returns the substring
/// through it, inclusive. Text with no terminal punctuation is returned
/// unchanged. A mark at index 0 counts as a match, so a bare `"."`
/// truncates to itself.
#[must_use]
pub fn truncate_to_sentence(text: &str) -> String {
    match text.rfind(['.', '?', '!']) {
        Some(i) => text[..=i].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("a   b\tc\n d"), "a b c d");
        assert_eq!(normalize("  leading and trailing  "), "leading and trailing");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn truncates_to_last_sentence() {
        assert_eq!(
            truncate_to_sentence("Hello world. Next sentence"),
            "Hello world."
        );
    }

    #[test]
    fn no_punctuation_is_unchanged() {
        assert_eq!(
            truncate_to_sentence("no punctuation here"),
            "no punctuation here"
        );
    }

    #[test]
    fn rightmost_mark_wins_across_kinds() {
        assert_eq!(truncate_to_sentence("Really? Yes! Mostly. tail"), "Really? Yes! Mostly.");
        assert_eq!(truncate_to_sentence("Mostly. Yes! Really? tail"), "Mostly. Yes! Really?");
    }

    #[test]
    fn mark_at_index_zero_is_a_match() {
        assert_eq!(truncate_to_sentence(". trailing words"), ".");
        assert_eq!(truncate_to_sentence("?"), "?");
    }

    #[test]
    fn multibyte_text_truncates_on_char_boundary() {
        assert_eq!(truncate_to_sentence("héllo wörld. ünfinished"), "héllo wörld.");
    }
}
