use crate::extract::ExtractedDocument;
use crate::tokenizer::{is_indexable, tokenize};
use crate::{DocId, IndexOptions, IndexStatistics, IndexedDocument};
use std::collections::{BTreeMap, BTreeSet};
use time::OffsetDateTime;

/// Per-term, per-document bookkeeping overhead used by the memory estimate.
const TERM_OVERHEAD: usize = 50;

/// Document store plus the inverted index derived from it.
///
/// Invariant: `inverted` is exactly the union over stored documents of
/// `{term: {doc.id}}` for every key of `doc.terms`. Posting sets are never empty.
#[derive(Debug, Default)]
pub struct SearchIndex {
    documents: BTreeMap<DocId, IndexedDocument>,
    inverted: BTreeMap<String, BTreeSet<DocId>>,
}

impl SearchIndex {
    pub fn new() -> Self { Self::default() }

    /// Tokenize and store an extracted document. An existing record with the
    /// same id is removed first.
    pub fn insert(&mut self, extracted: ExtractedDocument, format: &str, opts: IndexOptions) -> &IndexedDocument {
        let ExtractedDocument { content, metadata } = extracted;
        let id = opts.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        if self.remove(&id) {
            tracing::debug!(%id, "replacing existing document");
        }

        let tokens = tokenize(&content);
        let word_count = tokens.len();
        let mut terms: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut term_frequencies: BTreeMap<String, usize> = BTreeMap::new();
        for (term, pos) in tokens {
            if !is_indexable(&term) { continue; }
            *term_frequencies.entry(term.clone()).or_insert(0) += 1;
            terms.entry(term).or_default().push(pos);
        }
        for term in terms.keys() {
            self.inverted.entry(term.clone()).or_default().insert(id.clone());
        }

        let name = opts.name.or_else(|| metadata.title.clone()).unwrap_or_else(|| "Untitled".to_string());
        let doc = IndexedDocument {
            id: id.clone(),
            name,
            format: format.to_string(),
            metadata,
            content,
            terms,
            term_frequencies,
            word_count,
            indexed_at: OffsetDateTime::now_utc(),
            custom_fields: opts.custom_fields,
        };
        self.documents.entry(id).or_insert(doc)
    }

    /// Returns false and leaves the index untouched if `id` is absent.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(doc) = self.documents.remove(id) else { return false };
        for term in doc.terms.keys() {
            if let Some(postings) = self.inverted.get_mut(term) {
                postings.remove(id);
                if postings.is_empty() {
                    self.inverted.remove(term);
                }
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.documents.clear();
        self.inverted.clear();
    }

    pub fn get(&self, id: &str) -> Option<&IndexedDocument> { self.documents.get(id) }

    pub fn documents(&self) -> impl Iterator<Item = &IndexedDocument> { self.documents.values() }

    pub fn document_ids(&self) -> Vec<DocId> { self.documents.keys().cloned().collect() }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    pub fn postings(&self, term: &str) -> Option<&BTreeSet<DocId>> { self.inverted.get(term) }

    /// Distinct indexed terms with their posting sets, in term order.
    pub fn vocabulary(&self) -> impl Iterator<Item = (&String, &BTreeSet<DocId>)> { self.inverted.iter() }

    /// `ln(N / max(1, df))`. Zero when the term is in every document.
    pub fn idf(&self, term: &str) -> f64 {
        let df = self.postings(term).map_or(0, |p| p.len()).max(1);
        (self.len() as f64 / df as f64).ln()
    }

    /// `tf * idf` with tf taken from the document's own term count.
    pub fn score(&self, doc: &IndexedDocument, term: &str) -> f64 {
        if doc.word_count == 0 { return 0.0; }
        let tf = doc.term_frequencies.get(term).copied().unwrap_or(0) as f64 / doc.word_count as f64;
        tf * self.idf(term)
    }

    pub fn statistics(&self) -> IndexStatistics {
        let total_documents = self.documents.len();
        let mut formats: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_words = 0usize;
        let mut memory_estimate = 0usize;
        for doc in self.documents.values() {
            *formats.entry(doc.format.clone()).or_insert(0) += 1;
            total_words += doc.word_count;
            memory_estimate += doc.content.chars().count() * 2 + doc.terms.len() * TERM_OVERHEAD;
        }
        let average_word_count = if total_documents == 0 { 0.0 } else { total_words as f64 / total_documents as f64 };
        IndexStatistics { total_documents, total_terms: self.inverted.len(), average_word_count, memory_estimate, formats }
    }
}
