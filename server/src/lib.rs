use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use docsearch::{CustomFields, FacetCount, IndexOptions, IndexStatistics, IndexedDocument, SearchEngine, SearchError, SearchHit, SearchOptions, SortBy, SortOrder};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

pub mod preload;

type ApiError = (StatusCode, String);

/// Query-string form of [`SearchOptions`]. Absent fields keep the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub case_sensitive: Option<bool>,
    pub whole_word: Option<bool>,
    pub use_regex: Option<bool>,
    pub fuzzy_match: Option<bool>,
    pub fuzzy_threshold: Option<f64>,
    pub max_results: Option<usize>,
    pub context_length: Option<usize>,
    pub highlight_matches: Option<bool>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

impl SearchParams {
    pub fn options(&self) -> SearchOptions {
        let d = SearchOptions::default();
        SearchOptions {
            case_sensitive: self.case_sensitive.unwrap_or(d.case_sensitive),
            whole_word: self.whole_word.unwrap_or(d.whole_word),
            use_regex: self.use_regex.unwrap_or(d.use_regex),
            fuzzy_match: self.fuzzy_match.unwrap_or(d.fuzzy_match),
            fuzzy_threshold: self.fuzzy_threshold.unwrap_or(d.fuzzy_threshold),
            max_results: self.max_results.unwrap_or(d.max_results),
            context_length: self.context_length.unwrap_or(d.context_length),
            highlight_matches: self.highlight_matches.unwrap_or(d.highlight_matches),
            sort_by: self.sort_by.unwrap_or(d.sort_by),
            sort_order: self.sort_order.unwrap_or(d.sort_order),
        }
    }
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub hits: Vec<SearchHit>,
    pub facets: Vec<FacetCount>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    pub content: String,
    #[serde(default = "default_format")]
    pub format: String,
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub custom_fields: CustomFields,
}
fn default_format() -> String { "text".into() }

impl IndexRequest {
    fn options(&self) -> IndexOptions {
        IndexOptions { id: self.id.clone(), name: self.name.clone(), custom_fields: self.custom_fields.clone() }
    }
}

/// The engine has no locking of its own; this lock is the single-writer gate.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<SearchEngine>>,
    pub admin_token: Option<String>,
}

pub fn build_app(engine: SearchEngine) -> Router {
    build_app_with(engine, std::env::var("ADMIN_TOKEN").ok())
}

pub fn build_app_with(engine: SearchEngine, admin_token: Option<String>) -> Router {
    let app_state = AppState { engine: Arc::new(RwLock::new(engine)), admin_token };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .route("/documents", get(list_handler).post(index_handler).delete(clear_handler))
        .route("/documents/batch", post(index_batch_handler))
        .route("/documents/:id", get(doc_handler).delete(remove_handler))
        .route("/documents/:id/search", get(doc_search_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let result = state.engine.read().search(&params.q, &params.options());
    let elapsed = result.search_duration;
    Json(SearchResponse {
        query: result.query,
        took_ms: elapsed.as_millis(),
        took_s: elapsed.as_secs_f64(),
        total_hits: result.total_hits,
        hits: result.hits,
        facets: result.facets,
        suggestions: result.suggestions,
    })
}

pub async fn doc_search_handler(State(state): State<AppState>, Path(id): Path<String>, Query(params): Query<SearchParams>) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let hits = state.engine.read().search_in_document(&id, &params.q, &params.options()).map_err(api_error)?;
    Ok(Json(hits))
}

pub async fn doc_handler(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<IndexedDocument>, ApiError> {
    state
        .engine
        .read()
        .get_document(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(SearchError::DocumentNotFound(id)))
}

pub async fn list_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.engine.read().get_document_ids())
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStatistics> {
    Json(state.engine.read().get_statistics())
}

// --- Admin endpoints ---

async fn index_handler(State(state): State<AppState>, headers: HeaderMap, Json(req): Json<IndexRequest>) -> Result<Json<IndexedDocument>, ApiError> {
    authorize(&state, &headers)?;
    Ok(Json(index_one(&state, req).await?))
}

async fn index_batch_handler(State(state): State<AppState>, headers: HeaderMap, Json(reqs): Json<Vec<IndexRequest>>) -> Result<Json<Vec<IndexedDocument>>, ApiError> {
    authorize(&state, &headers)?;
    let mut out = Vec::with_capacity(reqs.len());
    for req in reqs {
        out.push(index_one(&state, req).await?);
    }
    Ok(Json(out))
}

/// Extract outside the lock, then take the write lock only for the synchronous insert.
async fn index_one(state: &AppState, req: IndexRequest) -> Result<IndexedDocument, ApiError> {
    let extractors = state.engine.read().extractors();
    let extracted = extractors.extract(req.content.as_bytes(), &req.format).await.map_err(api_error)?;
    let opts = req.options();
    Ok(state.engine.write().index_extracted(extracted, &req.format, opts))
}

async fn remove_handler(State(state): State<AppState>, headers: HeaderMap, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    authorize(&state, &headers)?;
    if state.engine.write().remove_document(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(api_error(SearchError::DocumentNotFound(id)))
    }
}

async fn clear_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode, ApiError> {
    authorize(&state, &headers)?;
    state.engine.write().clear_index();
    Ok(StatusCode::NO_CONTENT)
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}

fn api_error(err: SearchError) -> ApiError {
    let status = match &err {
        SearchError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
        SearchError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        SearchError::ExtractionFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, err.to_string())
}
