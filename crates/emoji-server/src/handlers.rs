//! `/api/*` route handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use emoji_core::{Category, EmojiEntry};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::health::{self, HealthResponse};
use crate::metrics::{SEARCH_DURATION_SECONDS, SEARCH_REQUESTS_TOTAL};
use crate::server::AppState;

/// One emoji as listed by the browse endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct EmojiSummary {
    /// The emoji itself.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Category label.
    pub category: Category,
}

impl From<&EmojiEntry> for EmojiSummary {
    fn from(entry: &EmojiEntry) -> Self {
        Self {
            symbol: entry.symbol.clone(),
            name: entry.name.clone(),
            category: entry.category,
        }
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// The emoji itself.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Category label.
    pub category: Category,
    /// Cosine similarity to the query.
    pub score: f32,
}

/// `GET /api/emoji/search` response body.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// The query as received.
    pub query: String,
    /// Hits, best first.
    pub results: Vec<SearchHit>,
}

/// Raw search query string. Parsed by hand so bad input gets a JSON 400.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text query.
    pub query: Option<String>,
    /// Result limit.
    pub top_k: Option<String>,
}

/// Resolve `top_k`: absent means `default`, otherwise a positive integer.
pub fn parse_top_k(raw: Option<&str>, default: usize) -> Result<usize, ApiError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ApiError::BadRequest(
            "top_k must be a positive integer".to_string(),
        )),
    }
}

/// GET /api/emoji/groups
pub async fn groups(State(state): State<AppState>) -> Json<Vec<&'static str>> {
    Json(state.index.catalog().groups())
}

/// GET /api/emoji/all
pub async fn all(State(state): State<AppState>) -> Json<Vec<EmojiSummary>> {
    Json(
        state
            .index
            .catalog()
            .entries()
            .iter()
            .map(EmojiSummary::from)
            .collect(),
    )
}

/// GET /api/emoji/group/{name}
pub async fn group(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<EmojiSummary>>, ApiError> {
    let not_found = || ApiError::NotFound(format!("Group '{name}' not found"));
    let category: Category = name.parse().map_err(|_| not_found())?;
    let entries: Vec<EmojiSummary> = state
        .index
        .catalog()
        .by_category(category)
        .into_iter()
        .map(EmojiSummary::from)
        .collect();
    if entries.is_empty() {
        return Err(not_found());
    }
    Ok(Json(entries))
}

/// GET /api/emoji/search
///
/// 400 when `query` is missing, empty, or whitespace only; a non-blank query
/// is searched and echoed back untrimmed.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    metrics::counter!(SEARCH_REQUESTS_TOTAL).increment(1);

    let query = params.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Query parameter is required".to_string(),
        ));
    }
    let top_k = parse_top_k(params.top_k.as_deref(), state.default_top_k)?;

    let started = Instant::now();
    let ranked = state.index.search(&query, top_k).await?;
    metrics::histogram!(SEARCH_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

    let results = ranked
        .into_iter()
        .map(|r| SearchHit {
            symbol: r.entry.symbol,
            name: r.entry.name,
            category: r.entry.category,
            score: r.score,
        })
        .collect();

    Ok(Json(SearchResponse { query, results }))
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(
        state.start_time,
        state.index.len(),
        state.index.model_id(),
    ))
}

/// GET /metrics
pub async fn metrics_text(State(state): State<AppState>) -> String {
    crate::metrics::render(&state.metrics)
}
