//! Ordering, pagination, facets and "did you mean" suggestions.

use crate::index::SearchIndex;
use crate::similarity::{similarity, SUGGESTION_THRESHOLD};
use crate::tokenizer::tokenize;
use crate::{DocId, FacetCount, SearchHit, SortBy, SortOrder};
use regex::RegexBuilder;
use std::collections::{BTreeMap, BTreeSet};

pub const MAX_SUGGESTIONS: usize = 5;

/// Primary key follows `sort_by`/`order`; ties always break on document id,
/// then start position, then end position, ascending.
pub fn sort_hits(hits: &mut [SearchHit], sort_by: SortBy, order: SortOrder) {
    hits.sort_by(|a, b| {
        let primary = match sort_by {
            SortBy::Relevance => a.score.total_cmp(&b.score),
            SortBy::Position => a.start_position.cmp(&b.start_position),
            SortBy::Document => a.document_name.cmp(&b.document_name),
        };
        let primary = if order == SortOrder::Descending { primary.reverse() } else { primary };
        primary
            .then_with(|| a.document_id.cmp(&b.document_id))
            .then_with(|| a.start_position.cmp(&b.start_position))
            .then_with(|| a.end_position.cmp(&b.end_position))
    });
}

/// Sort then truncate. Returns `(total_hits, page)`.
pub fn paginate(mut hits: Vec<SearchHit>, sort_by: SortBy, order: SortOrder, max_results: usize) -> (usize, Vec<SearchHit>) {
    sort_hits(&mut hits, sort_by, order);
    let total = hits.len();
    hits.truncate(max_results);
    (total, hits)
}

/// Candidate documents grouped by format, most frequent first.
pub fn facets(index: &SearchIndex, candidates: &BTreeSet<DocId>) -> Vec<FacetCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in candidates.iter().filter_map(|id| index.get(id)) {
        *counts.entry(doc.format.as_str()).or_insert(0) += 1;
    }
    let mut out: Vec<FacetCount> = counts.into_iter().map(|(format, count)| FacetCount { format: format.to_string(), count }).collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.format.cmp(&b.format)));
    out
}

/// Alternate queries with one token swapped for a close vocabulary term.
pub fn suggestions(index: &SearchIndex, query: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (token, _) in tokenize(query) {
        let mut close: Vec<(f64, &String)> = index
            .vocabulary()
            .map(|(term, _)| (similarity(term, &token), term))
            .filter(|(sim, term)| *sim >= SUGGESTION_THRESHOLD && **term != token)
            .collect();
        close.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        for (_, term) in close {
            let rewritten = replace_token(query, &token, term);
            if !out.contains(&rewritten) {
                out.push(rewritten);
            }
            if out.len() >= MAX_SUGGESTIONS { return out; }
        }
    }
    out
}

/// Swap the first occurrence of `token` in the raw query. When punctuation
/// hides the token, the whole raw word is swapped and its `+`/`-`/quote
/// operators kept.
fn replace_token(query: &str, token: &str, replacement: &str) -> String {
    if let Ok(pat) = RegexBuilder::new(&regex::escape(token)).case_insensitive(true).build() {
        if pat.is_match(query) {
            return pat.replace(query, regex::NoExpand(replacement)).into_owned();
        }
    }
    let mut replaced = false;
    query
        .split_whitespace()
        .map(|raw| {
            if replaced || !tokenize(raw).iter().any(|(t, _)| t == token) {
                return raw.to_string();
            }
            replaced = true;
            let prefix_len = raw.len() - raw.trim_start_matches(['+', '-', '"']).len();
            let suffix_len = raw.len() - raw.trim_end_matches('"').len();
            let suffix = if suffix_len < raw.len() - prefix_len { &raw[raw.len() - suffix_len..] } else { "" };
            format!("{}{replacement}{suffix}", &raw[..prefix_len])
        })
        .collect::<Vec<_>>()
        .join(" ")
}
