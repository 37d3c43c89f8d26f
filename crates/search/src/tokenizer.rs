//! Word splitting shared by indexing and querying.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens shorter than this many characters are discarded.
pub const MIN_TERM_CHARS: usize = 3;

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("static pattern is valid"));

/// Lowercase, blank out punctuation, split on whitespace and keep terms of at least
/// [`MIN_TERM_CHARS`] characters. Stop-words are kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");
    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_TERM_CHARS)
        .map(ToString::to_string)
        .collect()
}
