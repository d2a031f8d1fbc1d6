//! Candidate document sets from typed query terms.

use crate::index::SearchIndex;
use crate::query::QueryTerm;
use crate::similarity::is_similar;
use crate::{DocId, SearchOptions};
use std::collections::BTreeSet;

/// Documents containing `term` under the active match mode.
///
/// Vocabulary lookups use the case-folded term since the index is lowercase;
/// `case_sensitive` only affects phrase scans here.
pub fn term_postings(index: &SearchIndex, term: &QueryTerm, opts: &SearchOptions) -> BTreeSet<DocId> {
    if let QueryTerm::Phrase(phrase) = term {
        return phrase_postings(index, phrase, opts.case_sensitive);
    }
    let needle = term.text().to_lowercase();
    let mut out = BTreeSet::new();
    if opts.fuzzy_match {
        for (vocab, postings) in index.vocabulary() {
            if is_similar(vocab, &needle, opts.fuzzy_threshold) {
                out.extend(postings.iter().cloned());
            }
        }
    } else if opts.whole_word {
        if let Some(postings) = index.postings(&needle) {
            out.extend(postings.iter().cloned());
        }
    } else {
        for (vocab, postings) in index.vocabulary() {
            if vocab.contains(needle.as_str()) || needle.contains(vocab.as_str()) {
                out.extend(postings.iter().cloned());
            }
        }
    }
    out
}

fn phrase_postings(index: &SearchIndex, phrase: &str, case_sensitive: bool) -> BTreeSet<DocId> {
    let needle = if case_sensitive { phrase.to_string() } else { phrase.to_lowercase() };
    index
        .documents()
        .filter(|doc| {
            if case_sensitive { doc.content.contains(&needle) } else { doc.content.to_lowercase().contains(&needle) }
        })
        .map(|doc| doc.id.clone())
        .collect()
}

/// Required terms intersect, optional terms union, excluded terms subtract
/// at the end. The first required term replaces whatever optional terms
/// collected before it.
pub fn evaluate<F>(terms: &[QueryTerm], mut postings: F) -> BTreeSet<DocId>
where
    F: FnMut(&QueryTerm) -> BTreeSet<DocId>,
{
    let mut candidates: BTreeSet<DocId> = BTreeSet::new();
    let mut seeded_by_required = false;
    for term in terms.iter().filter(|t| !t.is_excluded()) {
        let set = postings(term);
        if !term.is_required() {
            candidates.extend(set);
        } else if seeded_by_required {
            candidates = candidates.intersection(&set).cloned().collect();
        } else {
            candidates = set;
            seeded_by_required = true;
        }
    }
    for term in terms.iter().filter(|t| t.is_excluded()) {
        for id in postings(term) {
            candidates.remove(&id);
        }
    }
    candidates
}

pub fn candidates(index: &SearchIndex, terms: &[QueryTerm], opts: &SearchOptions) -> BTreeSet<DocId> {
    evaluate(terms, |term| term_postings(index, term, opts))
}
