//! Message similarity for duplicate detection.
//!
//! Different reviewers describe the same logical issue in different words
//! ("unvalidated user input reaches the shell" vs "user input passed to
//! shell without validation"). This module scores two messages with a
//! Jaccard ratio over normalized tokens. Normalization is pure text
//! processing, with no I/O and no provider knowledge.

use std::collections::BTreeSet;

/// Words too common to carry signal when comparing issue descriptions.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "by", "for", "from", "if", "in", "is",
    "it", "its", "not", "of", "on", "or", "that", "the", "this", "to", "was", "when", "with",
    "without",
];

/// Suffixes stripped during stemming, longest first so only one applies.
const SUFFIXES: &[&str] = &[
    "ations", "ation", "ated", "ates", "ings", "ing", "ies", "ers", "ed", "es", "s",
];

/// Jaccard similarity over normalized tokens, in `0.0..=1.0`.
///
/// # Example
///
/// ```
/// use council_domain::message_similarity;
///
/// let a = "unvalidated user input reaches the shell";
/// let b = "user input passed to shell without validation";
/// assert!(message_similarity(a, b) >= 0.6);
/// assert!(message_similarity(a, "missing test coverage for hooks") < 0.2);
/// ```
pub fn message_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = normalize_tokens(a);
    let tokens_b = normalize_tokens(b);

    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 1.0;
    }
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.len() + tokens_b.len() - intersection;
    intersection as f64 / union as f64
}

/// Lowercase, strip punctuation, drop stopwords, stem.
fn normalize_tokens(text: &str) -> BTreeSet<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty() && !STOPWORDS.contains(&word.as_str()))
        .map(|word| stem(&word))
        .collect()
}

/// Crude stemmer: folds inflections ("validated", "validation") onto a
/// shared stem so paraphrases overlap. Not linguistically rigorous, just
/// enough for near-duplicate detection across reviewer wordings.
fn stem(word: &str) -> String {
    let mut stemmed = word.to_string();

    // "unvalidated" and "validation" should meet at "valid".
    if stemmed.len() >= 6
        && let Some(rest) = stemmed.strip_prefix("un")
    {
        stemmed = rest.to_string();
    }

    for suffix in SUFFIXES {
        if stemmed.len() > suffix.len() + 2 && stemmed.ends_with(suffix) {
            stemmed.truncate(stemmed.len() - suffix.len());
            break;
        }
    }

    stemmed
}
