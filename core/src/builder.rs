use crate::engine::SearchEngine;
use crate::{SearchOptions, SearchResult, SortBy, SortOrder};

/// Fluent query assembly. Produces a query string plus options and hands
/// both to [`SearchEngine::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    parts: Vec<String>,
    options: SearchOptions,
}

impl SearchQuery {
    pub fn new() -> Self { Self::default() }

    pub fn term(mut self, term: &str) -> Self {
        self.parts.push(term.to_string());
        self
    }

    pub fn must_have(mut self, term: &str) -> Self {
        self.parts.push(format!("+{term}"));
        self
    }

    pub fn must_not_have(mut self, term: &str) -> Self {
        self.parts.push(format!("-{term}"));
        self
    }

    pub fn phrase(mut self, phrase: &str) -> Self {
        self.parts.push(format!("\"{}\"", phrase.replace('"', "")));
        self
    }

    pub fn case_sensitive(mut self, on: bool) -> Self {
        self.options.case_sensitive = on;
        self
    }

    pub fn whole_word(mut self, on: bool) -> Self {
        self.options.whole_word = on;
        self
    }

    pub fn regex(mut self, on: bool) -> Self {
        self.options.use_regex = on;
        self
    }

    pub fn fuzzy(mut self, threshold: f64) -> Self {
        self.options.fuzzy_match = true;
        self.options.fuzzy_threshold = threshold;
        self
    }

    pub fn limit(mut self, max_results: usize) -> Self {
        self.options.max_results = max_results;
        self
    }

    pub fn context_length(mut self, chars: usize) -> Self {
        self.options.context_length = chars;
        self
    }

    pub fn sort_by(mut self, by: SortBy, order: SortOrder) -> Self {
        self.options.sort_by = by;
        self.options.sort_order = order;
        self
    }

    pub fn build(self) -> (String, SearchOptions) { (self.parts.join(" "), self.options) }

    pub fn execute(self, engine: &SearchEngine) -> SearchResult {
        let (query, options) = self.build();
        engine.search(&query, &options)
    }
}
