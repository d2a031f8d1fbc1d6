use docsearch::{IndexOptions, SearchEngine, SearchError, SearchOptions, SearchQuery, SortBy, SortOrder};

async fn sample_engine() -> SearchEngine {
    let mut engine = SearchEngine::default();
    engine.index_document(b"the quick brown fox jumps over the lazy dog", "text", with_id("a")).await.unwrap();
    engine.index_document(b"the quick cat sleeps all day", "text", with_id("b")).await.unwrap();
    engine
}

fn with_id(id: &str) -> IndexOptions {
    IndexOptions { id: Some(id.to_string()), ..Default::default() }
}

fn doc_ids(hits: &[docsearch::SearchHit]) -> Vec<&str> {
    let mut ids: Vec<&str> = hits.iter().map(|h| h.document_id.as_str()).collect();
    ids.dedup();
    ids
}

#[tokio::test]
async fn universal_term_scores_zero() {
    let engine = sample_engine().await;
    let result = engine.search("quick", &SearchOptions::default());
    assert_eq!(result.total_hits, 2);
    let mut ids = doc_ids(&result.hits);
    ids.sort();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(result.hits.iter().all(|h| h.score == 0.0));
    assert!(result.suggestions.is_empty());
}

#[tokio::test]
async fn rare_term_scores_tf_idf() {
    let engine = sample_engine().await;
    let result = engine.search("dog", &SearchOptions::default());
    assert_eq!(result.total_hits, 1);
    let hit = &result.hits[0];
    assert_eq!(hit.document_id, "a");
    assert!((hit.score - (1.0 / 9.0) * 2f64.ln()).abs() < 1e-12);
    assert!((hit.score - 0.0770).abs() < 1e-4);
    assert!(hit.highlighted_snippet.contains("<mark>dog</mark>"));
    assert_eq!(hit.matched_text, "dog");
    assert_eq!((hit.start_position, hit.end_position, hit.line_number), (40, 43, 1));
}

#[tokio::test]
async fn phrase_matches_contiguous_text_only() {
    let engine = sample_engine().await;
    let result = engine.search(r#""brown fox""#, &SearchOptions::default());
    assert!(result.total_hits > 0);
    assert_eq!(doc_ids(&result.hits), vec!["a"]);

    let none = engine.search(r#""fox brown""#, &SearchOptions::default());
    assert_eq!(none.total_hits, 0);
}

#[tokio::test]
async fn exclusion_removes_documents() {
    let engine = sample_engine().await;
    let result = engine.search("quick -cat", &SearchOptions::default());
    assert_eq!(doc_ids(&result.hits), vec!["a"]);
    assert_eq!(result.facets.len(), 1);
    assert_eq!(result.facets[0].count, 1);
}

#[tokio::test]
async fn fuzzy_matches_at_threshold() {
    let engine = sample_engine().await;
    let opts = SearchOptions { fuzzy_match: true, fuzzy_threshold: 0.8, ..Default::default() };
    let result = engine.search("qwick", &opts);
    let mut ids = doc_ids(&result.hits);
    ids.sort();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(result.hits.iter().all(|h| h.matched_text == "quick"));
}

#[tokio::test]
async fn removal_updates_search_and_statistics() {
    let mut engine = sample_engine().await;
    let before = engine.get_statistics().total_documents;
    assert!(engine.remove_document("a"));
    let result = engine.search("fox", &SearchOptions::default());
    assert_eq!(result.total_hits, 0);
    assert_eq!(engine.get_statistics().total_documents, before - 1);
    assert!(engine.postings("fox").is_none());
}

#[tokio::test]
async fn removing_absent_id_changes_nothing() {
    let mut engine = sample_engine().await;
    let vocab = engine.vocabulary().iter().map(|s| s.to_string()).collect::<Vec<_>>();
    assert!(!engine.remove_document("zzz"));
    assert_eq!(engine.get_document_ids(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(engine.vocabulary(), vocab.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn zero_hits_offer_suggestions() {
    let engine = sample_engine().await;
    let result = engine.search("+lazzy", &SearchOptions { whole_word: true, ..Default::default() });
    assert_eq!(result.total_hits, 0);
    assert_eq!(result.suggestions, vec!["+lazy".to_string()]);
}

#[tokio::test]
async fn results_are_capped_and_deterministic() {
    let engine = sample_engine().await;
    let opts = SearchOptions { max_results: 2, sort_by: SortBy::Position, sort_order: SortOrder::Ascending, ..Default::default() };
    let first = engine.search("the", &opts);
    let second = engine.search("the", &opts);
    assert_eq!(first.total_hits, 3);
    assert_eq!(first.hits.len(), 2);
    let key = |r: &docsearch::SearchResult| r.hits.iter().map(|h| (h.document_id.clone(), h.start_position)).collect::<Vec<_>>();
    assert_eq!(key(&first), key(&second));
    assert_eq!(key(&first), vec![("a".to_string(), 0), ("b".to_string(), 0)]);
}

#[tokio::test]
async fn search_in_document_skips_ranking() {
    let engine = sample_engine().await;
    let hits = engine.search_in_document("a", "the", &SearchOptions::default()).unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.document_id == "a"));
    assert!(matches!(engine.search_in_document("c", "the", &SearchOptions::default()), Err(SearchError::DocumentNotFound(_))));
}

#[tokio::test]
async fn unsupported_format_is_rejected() {
    let mut engine = SearchEngine::default();
    let err = engine.index_document(b"%PDF-1.7", "pdf", IndexOptions::default()).await.unwrap_err();
    assert!(matches!(err, SearchError::UnsupportedFormat(_)));
    assert_eq!(engine.get_statistics().total_documents, 0);
}

#[tokio::test]
async fn batch_stops_at_first_failure() {
    let mut engine = SearchEngine::default();
    let batch = vec![
        (b"first doc".to_vec(), "text".to_string(), with_id("1")),
        (b"second doc".to_vec(), "pdf".to_string(), with_id("2")),
        (b"third doc".to_vec(), "text".to_string(), with_id("3")),
    ];
    assert!(engine.index_documents(batch).await.is_err());
    assert_eq!(engine.get_document_ids(), vec!["1".to_string()]);

    let ok = vec![
        (b"x1".to_vec(), "text".to_string(), with_id("x")),
        (b"y1".to_vec(), "md".to_string(), with_id("y")),
    ];
    let docs = engine.index_documents(ok).await.unwrap();
    assert_eq!(docs.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(), vec!["x", "y"]);
}

#[tokio::test]
async fn query_builder_runs_search() {
    let engine = sample_engine().await;
    let result = SearchQuery::new().must_have("quick").must_not_have("fox").limit(10).execute(&engine);
    assert_eq!(doc_ids(&result.hits), vec!["b"]);
}

#[tokio::test]
async fn case_sensitive_scan() {
    let mut engine = SearchEngine::default();
    engine.index_document(b"Rust and rust", "text", with_id("r")).await.unwrap();
    let opts = SearchOptions { case_sensitive: true, ..Default::default() };
    let result = engine.search("Rust", &opts);
    assert_eq!(result.total_hits, 1);
    assert_eq!(result.hits[0].start_position, 0);
    assert_eq!(engine.search("Rust", &SearchOptions::default()).total_hits, 2);
}

fn sorted_doc_ids(result: &docsearch::SearchResult) -> Vec<String> {
    let mut ids: Vec<String> = result.hits.iter().map(|h| h.document_id.clone()).collect();
    ids.sort();
    ids.dedup();
    ids
}

async fn single_doc_engine(content: &str) -> SearchEngine {
    let mut engine = SearchEngine::default();
    engine.index_document(content.as_bytes(), "text", with_id("d")).await.unwrap();
    engine
}

#[tokio::test]
async fn optional_before_required_matches_either_order() {
    let engine = sample_engine().await;
    let opts = SearchOptions::default();
    let before = engine.search("dog +quick", &opts);
    let after = engine.search("+quick dog", &opts);
    assert_eq!(sorted_doc_ids(&before), vec!["a", "b"]);
    assert_eq!(sorted_doc_ids(&after), vec!["a", "b"]);
    assert_eq!(before.facets[0].count, 2);
    assert_eq!(before.total_hits, after.total_hits);
}

#[tokio::test]
async fn required_terms_intersect_in_every_mode() {
    let engine = sample_engine().await;

    let whole = SearchOptions { whole_word: true, ..Default::default() };
    assert_eq!(sorted_doc_ids(&engine.search("+quick +dog", &whole)), vec!["a"]);

    assert_eq!(sorted_doc_ids(&engine.search("+qui +slee", &SearchOptions::default())), vec!["b"]);

    let fuzzy = SearchOptions { fuzzy_match: true, fuzzy_threshold: 0.8, ..Default::default() };
    let result = engine.search("+qwick +sleeep", &fuzzy);
    assert_eq!(sorted_doc_ids(&result), vec!["b"]);
    let mut matched: Vec<&str> = result.hits.iter().map(|h| h.matched_text.as_str()).collect();
    matched.sort();
    assert_eq!(matched, vec!["quick", "sleeps"]);
}

#[tokio::test]
async fn regex_terms_scan_content() {
    let engine = sample_engine().await;
    let opts = SearchOptions { use_regex: true, sort_by: SortBy::Position, sort_order: SortOrder::Ascending, ..Default::default() };
    let result = engine.search("fox|dog", &opts);
    assert_eq!(result.total_hits, 2);
    let matched: Vec<&str> = result.hits.iter().map(|h| h.matched_text.as_str()).collect();
    assert_eq!(matched, vec!["fox", "dog"]);
}

#[tokio::test]
async fn invalid_regex_matches_literally() {
    let engine = single_doc_engine("price (usd) rises").await;
    let opts = SearchOptions { use_regex: true, ..Default::default() };
    let result = engine.search("(usd", &opts);
    assert_eq!(result.total_hits, 1);
    assert_eq!(result.hits[0].matched_text, "(usd");
    assert_eq!(result.hits[0].start_position, 6);
}

#[tokio::test]
async fn highlighting_can_be_disabled() {
    let engine = sample_engine().await;
    let opts = SearchOptions { highlight_matches: false, ..Default::default() };
    let result = engine.search("dog", &opts);
    let hit = &result.hits[0];
    assert_eq!(hit.highlighted_snippet, hit.context);
    assert!(!hit.highlighted_snippet.contains("<mark>"));
}

#[tokio::test]
async fn whole_word_skips_embedded_occurrences() {
    let engine = single_doc_engine("cat category cat").await;
    let opts = SearchOptions { whole_word: true, sort_by: SortBy::Position, sort_order: SortOrder::Ascending, ..Default::default() };
    let result = engine.search("cat", &opts);
    let starts: Vec<usize> = result.hits.iter().map(|h| h.start_position).collect();
    assert_eq!(starts, vec![0, 13]);
    assert_eq!(engine.search("cat", &SearchOptions::default()).total_hits, 3);
}

#[tokio::test]
async fn fuzzy_hits_do_not_overlap() {
    let engine = single_doc_engine("quick quicks").await;
    let opts = SearchOptions { fuzzy_match: true, sort_by: SortBy::Position, sort_order: SortOrder::Ascending, ..Default::default() };
    let result = engine.search("quick", &opts);
    assert_eq!(result.total_hits, 2);
    let spans: Vec<(usize, &str)> = result.hits.iter().map(|h| (h.start_position, h.matched_text.as_str())).collect();
    assert_eq!(spans, vec![(0, "quick"), (6, "quicks")]);
}

#[tokio::test]
async fn fuzzy_case_sensitive_still_locates_capitalised_words() {
    let engine = single_doc_engine("Quick brown fox").await;
    let opts = SearchOptions { fuzzy_match: true, case_sensitive: true, ..Default::default() };
    let result = engine.search("Qwick", &opts);
    assert_eq!(result.total_hits, 1);
    assert_eq!(result.hits[0].matched_text, "Quick");
    assert!(result.suggestions.is_empty());
}
