use crate::error::{Result, SearchError};
use crate::extract::{ExtractedDocument, ExtractorRegistry};
use crate::hits::locate_hits;
use crate::index::SearchIndex;
use crate::query::{is_blank, parse_query};
use crate::{matcher, rank};
use crate::{DocId, IndexOptions, IndexStatistics, IndexedDocument, SearchHit, SearchOptions, SearchResult};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// A caller-owned index. There is no internal locking: concurrent readers are
/// fine, any mutation must be serialized by the owner.
pub struct SearchEngine {
    extractors: Arc<ExtractorRegistry>,
    index: SearchIndex,
}

impl Default for SearchEngine {
    fn default() -> Self { Self::new(ExtractorRegistry::with_defaults()) }
}

impl SearchEngine {
    pub fn new(extractors: ExtractorRegistry) -> Self {
        Self { extractors: Arc::new(extractors), index: SearchIndex::new() }
    }

    /// Shared handle to the registry, so extraction can run without holding
    /// whatever lock guards the engine.
    pub fn extractors(&self) -> Arc<ExtractorRegistry> { self.extractors.clone() }

    pub async fn index_document(&mut self, data: &[u8], format: &str, opts: IndexOptions) -> Result<IndexedDocument> {
        let extracted = self.extractors.extract(data, format).await?;
        Ok(self.index_extracted(extracted, format, opts))
    }

    /// Index each item in order. The first failure aborts the rest; items
    /// already indexed stay indexed.
    pub async fn index_documents<D: AsRef<[u8]>>(&mut self, batch: Vec<(D, String, IndexOptions)>) -> Result<Vec<IndexedDocument>> {
        let mut out = Vec::with_capacity(batch.len());
        for (data, format, opts) in batch {
            out.push(self.index_document(data.as_ref(), &format, opts).await?);
        }
        Ok(out)
    }

    /// Synchronous indexing core, for text that has already been extracted.
    pub fn index_extracted(&mut self, extracted: ExtractedDocument, format: &str, opts: IndexOptions) -> IndexedDocument {
        let doc = self.index.insert(extracted, format, opts);
        tracing::info!(id = %doc.id, format, words = doc.word_count, terms = doc.terms.len(), "indexed document");
        doc.clone()
    }

    pub fn remove_document(&mut self, id: &str) -> bool {
        let removed = self.index.remove(id);
        if removed {
            tracing::info!(id, "removed document");
        }
        removed
    }

    pub fn clear_index(&mut self) {
        tracing::info!(documents = self.index.len(), "clearing index");
        self.index.clear();
    }

    pub fn search(&self, query: &str, opts: &SearchOptions) -> SearchResult {
        let start = Instant::now();
        if is_blank(query) {
            return SearchResult::empty(query, start.elapsed());
        }

        let terms = parse_query(query, opts.case_sensitive);
        let candidates: BTreeSet<DocId> = matcher::candidates(&self.index, &terms, opts);
        tracing::debug!(query, terms = ?terms, candidates = candidates.len(), "search plan");

        let mut seq = 0usize;
        let hits: Vec<SearchHit> = candidates
            .iter()
            .filter_map(|id| self.index.get(id))
            .flat_map(|doc| locate_hits(doc, &terms, &self.index, opts, &mut seq))
            .collect();

        let (total_hits, hits) = rank::paginate(hits, opts.sort_by, opts.sort_order, opts.max_results);
        let facets = rank::facets(&self.index, &candidates);
        let suggestions = if total_hits == 0 { rank::suggestions(&self.index, query) } else { vec![] };

        SearchResult { query: query.to_string(), total_hits, hits, facets, suggestions, search_duration: start.elapsed() }
    }

    /// Locate and score hits in one document, unsorted and unpaginated.
    pub fn search_in_document(&self, id: &str, query: &str, opts: &SearchOptions) -> Result<Vec<SearchHit>> {
        let doc = self.index.get(id).ok_or_else(|| SearchError::DocumentNotFound(id.to_string()))?;
        if is_blank(query) {
            return Ok(vec![]);
        }
        let terms = parse_query(query, opts.case_sensitive);
        let mut seq = 0usize;
        Ok(locate_hits(doc, &terms, &self.index, opts, &mut seq))
    }

    pub fn get_document(&self, id: &str) -> Option<&IndexedDocument> { self.index.get(id) }

    pub fn get_document_ids(&self) -> Vec<DocId> { self.index.document_ids() }

    pub fn get_statistics(&self) -> IndexStatistics { self.index.statistics() }

    pub fn postings(&self, term: &str) -> Option<&BTreeSet<DocId>> { self.index.postings(term) }

    pub fn vocabulary(&self) -> Vec<&str> { self.index.vocabulary().map(|(t, _)| t.as_str()).collect() }
}
