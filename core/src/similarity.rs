//! Normalized Levenshtein similarity.
//!
//! Every fuzzy lookup compares the query term against the whole vocabulary, so
//! cost is O(distinct terms) per query term. An n-gram or prefix index over the
//! vocabulary would be the next step for large corpora.

/// Similarity cutoff for "did you mean" suggestions.
pub const SUGGESTION_THRESHOLD: f64 = 0.6;

pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() { return b.len(); }
    if b.is_empty() { return a.len(); }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        cur[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            cur[j] = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// `(max_len - distance) / max_len`; 1.0 for identical strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b { return 1.0; }
    let max_len = a.chars().count().max(b.chars().count());
    if a.is_empty() || b.is_empty() { return 0.0; }
    (max_len - edit_distance(a, b)) as f64 / max_len as f64
}

/// Inclusive threshold check.
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool { similarity(a, b) >= threshold }
