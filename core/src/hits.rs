//! Concrete occurrences, context windows, scores and highlighting.

use crate::index::SearchIndex;
use crate::query::QueryTerm;
use crate::similarity::is_similar;
use crate::{IndexedDocument, SearchHit, SearchOptions};
use regex::{Regex, RegexBuilder};

pub const HIGHLIGHT_OPEN: &str = "<mark>";
pub const HIGHLIGHT_CLOSE: &str = "</mark>";
const ELLIPSIS: &str = "...";

/// Regex for one term. An invalid user regex falls back to the escaped literal.
pub fn build_pattern(term: &str, opts: &SearchOptions) -> Option<Regex> {
    let literal = regex::escape(term);
    let source = if opts.use_regex {
        term.to_string()
    } else if opts.whole_word {
        format!(r"\b{literal}\b")
    } else {
        literal.clone()
    };
    let build = |src: &str| RegexBuilder::new(src).case_insensitive(!opts.case_sensitive).build();
    match build(&source) {
        Ok(pat) => Some(pat),
        Err(err) => {
            tracing::debug!(term, %err, "invalid pattern, matching literally");
            build(&literal).ok()
        }
    }
}

/// Whole-token, case-folded pattern for a vocabulary term.
fn vocabulary_pattern(term: &str) -> Option<Regex> {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(term))).case_insensitive(true).build().ok()
}

/// Terms to locate in `doc` for one query term, each with its pattern. Fuzzy
/// mode expands into the document's own similar vocabulary, which is
/// lowercase, so those tokens match whole and ignore `case_sensitive`.
fn located_terms(doc: &IndexedDocument, term: &QueryTerm, opts: &SearchOptions) -> Vec<(String, Option<Regex>)> {
    if opts.fuzzy_match && !opts.use_regex && !term.is_phrase() {
        let needle = term.text().to_lowercase();
        return doc
            .terms
            .keys()
            .filter(|t| is_similar(t, &needle, opts.fuzzy_threshold))
            .map(|t| (t.clone(), vocabulary_pattern(t)))
            .collect();
    }
    vec![(term.text().to_string(), build_pattern(term.text(), opts))]
}

/// Every hit for every non-excluded term in one document. `seq` numbers hits
/// across a whole search so ids stay unique.
pub fn locate_hits(doc: &IndexedDocument, terms: &[QueryTerm], index: &SearchIndex, opts: &SearchOptions, seq: &mut usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for term in terms.iter().filter(|t| !t.is_excluded()) {
        for (located, pattern) in located_terms(doc, term, opts) {
            let Some(pattern) = pattern else { continue };
            let score = index.score(doc, &located.to_lowercase());
            for m in pattern.find_iter(&doc.content) {
                if m.start() == m.end() { continue; }
                *seq += 1;
                hits.push(make_hit(doc, m.start(), m.end(), score, opts, *seq));
            }
        }
    }
    hits
}

fn make_hit(doc: &IndexedDocument, start: usize, end: usize, score: f64, opts: &SearchOptions, seq: usize) -> SearchHit {
    let content = doc.content.as_str();
    let matched_text = content[start..end].to_string();
    let context = context_window(content, start, end, opts.context_length);
    let highlighted_snippet = if opts.highlight_matches { highlight(&context, &matched_text) } else { context.clone() };
    let start_position = content[..start].chars().count();
    SearchHit {
        id: format!("{}-{seq}", doc.id),
        document_id: doc.id.clone(),
        document_name: doc.name.clone(),
        end_position: start_position + matched_text.chars().count(),
        start_position,
        line_number: 1 + content[..start].matches('\n').count(),
        matched_text,
        context,
        score,
        highlighted_snippet,
    }
}

/// `len` characters either side of the byte range `[start, end)`, with `...`
/// marking a truncated side.
pub fn context_window(content: &str, start: usize, end: usize, len: usize) -> String {
    let left = if len == 0 {
        start
    } else {
        content[..start].char_indices().rev().take(len).last().map_or(start, |(i, _)| i)
    };
    let right = content[end..].char_indices().nth(len).map_or(content.len(), |(i, _)| end + i);
    let mut out = String::with_capacity(right - left + 2 * ELLIPSIS.len());
    if left > 0 { out.push_str(ELLIPSIS); }
    out.push_str(&content[left..right]);
    if right < content.len() { out.push_str(ELLIPSIS); }
    out
}

/// Wrap every case-insensitive occurrence of `matched` in the context.
pub fn highlight(context: &str, matched: &str) -> String {
    if matched.is_empty() { return context.to_string(); }
    match RegexBuilder::new(&regex::escape(matched)).case_insensitive(true).build() {
        Ok(pat) => pat
            .replace_all(context, |caps: &regex::Captures| format!("{HIGHLIGHT_OPEN}{}{HIGHLIGHT_CLOSE}", &caps[0]))
            .into_owned(),
        Err(_) => context.to_string(),
    }
}
