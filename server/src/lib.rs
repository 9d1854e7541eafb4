use anyhow::{Context, Result};
use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use parking_lot::RwLock;
use searchcore::corpus::load_documents;
use searchcore::{DocId, Document, InvertedIndex};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const MAX_K: usize = 200;
const ADMIN_HEADER: &str = "X-ADMIN-TOKEN";

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub title: String,
    pub lines: Vec<String>,
    pub snippet: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    pub corpus: PathBuf,
    /// Required in `X-ADMIN-TOKEN` for admin endpoints; unset disables them.
    pub admin_token: Option<String>,
    /// Comma-separated origins; unset or empty allows any.
    pub cors_allow_origin: Option<String>,
}

impl ServerConfig {
    /// Reads `ADMIN_TOKEN` and `CORS_ALLOW_ORIGIN`.
    pub fn from_env(corpus: impl Into<PathBuf>) -> Self {
        Self {
            corpus: corpus.into(),
            admin_token: std::env::var("ADMIN_TOKEN").ok(),
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN").ok(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub corpus: PathBuf,
    /// Replaced wholesale on reload; searches keep the `Arc` they started with.
    pub index: Arc<RwLock<Arc<InvertedIndex>>>,
    pub admin_token: Option<String>,
}

impl AppState {
    fn current(&self) -> Arc<InvertedIndex> {
        self.index.read().clone()
    }
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    let index = open_index(&config.corpus)?;
    let app_state = AppState {
        corpus: config.corpus.clone(),
        index: Arc::new(RwLock::new(Arc::new(index))),
        admin_token: config.admin_token.clone(),
    };

    let origins: Vec<_> = config
        .cors_allow_origin
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/index/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

fn open_index(corpus: &std::path::Path) -> Result<InvertedIndex> {
    let docs = load_documents(corpus).with_context(|| format!("loading corpus from {}", corpus.display()))?;
    let index = InvertedIndex::build(docs)?;
    tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), "index loaded");
    Ok(index)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let index = state.current();
    let hits = index.search(&params.q);
    let total_hits = hits.len();
    let k = params.k.clamp(1, MAX_K);

    let raw_terms = highlight_words(&index, &params.q);
    let results = hits
        .into_iter()
        .take(k)
        .map(|doc| SearchHit {
            doc_id: doc.id(),
            title: doc.title().to_string(),
            lines: doc.lines().to_vec(),
            snippet: snippet(doc, &raw_terms),
        })
        .collect();

    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_ms: elapsed.as_millis(), took_s: elapsed.as_secs_f64(), total_hits, results })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> (StatusCode, Json<serde_json::Value>) {
    let index = state.current();
    match index.get(doc_id) {
        Some(doc) => (StatusCode::OK, Json(serde_json::json!(doc))),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" }))),
    }
}

/// Rebuild from the corpus file and swap it in. On failure the previous
/// index keeps serving.
async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers, "reload the index")?;
    let index = open_index(&state.corpus).map_err(|e| {
        tracing::warn!(error = %format!("{e:#}"), "reload failed");
        (StatusCode::UNPROCESSABLE_ENTITY, format!("{e:#}"))
    })?;
    let body = serde_json::json!({ "num_docs": index.num_docs(), "num_terms": index.num_terms() });
    *state.index.write() = Arc::new(index);
    Ok(Json(body))
}

/// Admin calls need `X-ADMIN-TOKEN` to match the configured token; with no
/// token configured they are refused outright.
fn authorize(state: &AppState, headers: &HeaderMap, action: &str) -> Result<(), (StatusCode, String)> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err((StatusCode::UNAUTHORIZED, format!("ADMIN_TOKEN must be set to {action}")));
    };
    match headers.get(ADMIN_HEADER).map(|v| v.to_str()) {
        Some(Ok(token)) if token == expected => Ok(()),
        Some(_) => Err((StatusCode::UNAUTHORIZED, format!("invalid {ADMIN_HEADER} to {action}"))),
        None => Err((StatusCode::UNAUTHORIZED, format!("{ADMIN_HEADER} header required to {action}"))),
    }
}

/// Query words as typed, minus the punctuation the normalizer deletes.
fn highlight_words(index: &InvertedIndex, query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|w| index.normalizer().strip_punctuation(w))
        .filter(|w| !w.is_empty())
        .collect()
}

/// First line mentioning any raw query word, with the words highlighted.
fn snippet(doc: &Document, raw_terms: &[String]) -> Option<String> {
    let line = doc.lines().iter().find(|line| {
        let lower = line.to_lowercase();
        raw_terms.iter().any(|t| lower.contains(&t.to_lowercase()))
    })?;
    Some(highlight_terms(line, raw_terms))
}

fn highlight_terms(line: &str, terms: &[String]) -> String {
    let mut s = line.to_string();
    for t in terms {
        let Ok(pat) = regex::RegexBuilder::new(&regex::escape(t)).case_insensitive(true).build() else {
            continue;
        };
        s = pat.replace_all(&s, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0])).to_string();
    }
    s
}
