//! In-memory full-text search over extracted document text.
//!
//! Documents go in through an [`Extractor`], get tokenized into a per-document
//! term map and a shared inverted index, and come back out of
//! [`SearchEngine::search`] as scored, highlighted [`SearchHit`]s.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;
use time::OffsetDateTime;

pub mod builder;
pub mod engine;
pub mod error;
pub mod extract;
pub mod hits;
pub mod index;
pub mod matcher;
pub mod query;
pub mod rank;
pub mod similarity;
pub mod tokenizer;

pub use builder::SearchQuery;
pub use engine::SearchEngine;
pub use error::{ExtractError, Result, SearchError};
pub use extract::{DocumentMetadata, ExtractedDocument, Extractor, ExtractorRegistry, PlainTextExtractor};
pub use query::QueryTerm;

pub type DocId = String;
pub type CustomFields = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize)]
pub struct IndexedDocument {
    pub id: DocId,
    pub name: String,
    pub format: String,
    pub metadata: DocumentMetadata,
    pub content: String,
    /// Term -> token positions, in document order.
    pub terms: BTreeMap<String, Vec<usize>>,
    pub term_frequencies: BTreeMap<String, usize>,
    /// All tokens, including the ones too short to be indexed.
    pub word_count: usize,
    #[serde(serialize_with = "rfc3339")]
    pub indexed_at: OffsetDateTime,
    pub custom_fields: CustomFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexOptions {
    pub id: Option<DocId>,
    pub name: Option<String>,
    #[serde(default)]
    pub custom_fields: CustomFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub document_id: DocId,
    pub document_name: String,
    pub matched_text: String,
    pub context: String,
    /// Character offsets into the document content.
    pub start_position: usize,
    pub end_position: usize,
    pub line_number: usize,
    pub score: f64,
    pub highlighted_snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub format: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub total_hits: usize,
    pub hits: Vec<SearchHit>,
    pub facets: Vec<FacetCount>,
    pub suggestions: Vec<String>,
    pub search_duration: Duration,
}

impl SearchResult {
    pub fn empty(query: &str, search_duration: Duration) -> Self {
        Self { query: query.to_string(), total_hits: 0, hits: vec![], facets: vec![], suggestions: vec![], search_duration }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStatistics {
    pub total_documents: usize,
    pub total_terms: usize,
    pub average_word_count: f64,
    pub memory_estimate: usize,
    pub formats: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Relevance,
    Position,
    Document,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub whole_word: bool,
    #[serde(default)]
    pub use_regex: bool,
    #[serde(default)]
    pub fuzzy_match: bool,
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_context_length")]
    pub context_length: usize,
    #[serde(default = "default_true")]
    pub highlight_matches: bool,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_fuzzy_threshold() -> f64 { 0.8 }
fn default_max_results() -> usize { 100 }
fn default_context_length() -> usize { 50 }
fn default_true() -> bool { true }

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_word: false,
            use_regex: false,
            fuzzy_match: false,
            fuzzy_threshold: default_fuzzy_threshold(),
            max_results: default_max_results(),
            context_length: default_context_length(),
            highlight_matches: true,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

fn rfc3339<S: Serializer>(ts: &OffsetDateTime, s: S) -> std::result::Result<S::Ok, S::Error> {
    let formatted = ts.format(&time::format_description::well_known::Rfc3339).map_err(serde::ser::Error::custom)?;
    s.serialize_str(&formatted)
}
