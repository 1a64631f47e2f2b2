use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\w+").expect("valid regex");
}

/// Split text into maximal runs of word characters (letters, digits, underscore).
///
/// Everything else acts as a separator, so the result never contains empty tokens.
/// No case folding happens here: corpus text is lower-cased when it is loaded.
pub fn tokenize(text: &str) -> Vec<&str> {
    WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Normalize a query term the same way corpus text is normalized.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}
