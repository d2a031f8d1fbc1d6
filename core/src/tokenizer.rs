use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").expect("valid regex");
}

/// Shortest term that makes it into the inverted index.
pub const MIN_TERM_LEN: usize = 2;

/// Tokenize text into (term, position): lowercase, strip everything that is not
/// a word character or whitespace, split on whitespace runs.
pub fn tokenize(text: &str) -> Vec<(String, usize)> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, "");
    cleaned
        .split_whitespace()
        .enumerate()
        .map(|(pos, tok)| (tok.to_string(), pos))
        .collect()
}

pub fn is_indexable(term: &str) -> bool { term.chars().count() >= MIN_TERM_LEN }
