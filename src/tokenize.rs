//! Tokenization: the two fixed extractors every token list derives from.
//!
//! All scoring, analysis, and assembly operate on lower-cased token lists
//! produced here. `words` keeps word runs only; `words_and_marks` also emits
//! each non-word, non-space character as its own token so punctuation keeps
//! its sentence position.

use std::sync::LazyLock;

use regex::Regex;

// ── Regex patterns ──────────────────────────────────────────────────────

static RE_WORDS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

static RE_WORDS_AND_MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b|[^\w\s]").unwrap());

/// ASCII punctuation set. Membership is substring containment, so every
/// single punctuation character qualifies and so does a lone underscore
/// (which the word pattern can emit as a token).
pub const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Whether a token counts as punctuation.
pub fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && PUNCTUATION.contains(token)
}

/// Lower-cased word tokens, punctuation dropped.
pub fn words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE_WORDS
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| !is_punctuation(t))
        .collect()
}

/// Lower-cased word tokens interleaved with single-character marks, in
/// source order. Callers that only care about words filter with
/// [`is_punctuation`].
pub fn words_and_marks(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE_WORDS_AND_MARKS
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}
