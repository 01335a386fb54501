//! HTTP request handlers

use super::state::AppState;
use crate::error::SearchError;
use crate::providers::CITY_KEY;
use crate::query::Query as SearchQuery;
use crate::results::SearchResult;
use crate::search::SearchOptions;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Page number
    pub page: Option<usize>,
    /// Slots per provider on one page
    pub block_size: Option<usize>,
    /// City used by the city-only option
    pub city: Option<String>,
}

/// Search results response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub phrases: Vec<String>,
    pub excludes: Vec<String>,
    pub options: Vec<String>,
    pub limit_reached: bool,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub page_count: usize,
    pub results: Vec<SearchResult>,
}

/// Provider listing entry
#[derive(Debug, Serialize)]
pub struct ProviderResponse {
    pub key: String,
    pub kind: String,
    pub category: String,
}

/// Error body returned by the API
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = match &self {
            SearchError::NoProvidersRegistered => StatusCode::SERVICE_UNAVAILABLE,
            SearchError::Provider { .. } => StatusCode::BAD_GATEWAY,
            SearchError::InvalidPage(_) | SearchError::InvalidBlockSize(_) => {
                StatusCode::BAD_REQUEST
            }
        };
        error_response(status, self.to_string())
    }
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let raw_query = match params.q {
        Some(q) if !q.trim().is_empty() => q,
        _ => return error_response(StatusCode::BAD_REQUEST, "Missing query"),
    };

    let search = &state.settings.search;
    let query = SearchQuery::parse(&raw_query, search.token_limit, &search.options);
    let block_size = search.effective_block_size(params.block_size);

    let mut options = SearchOptions::new();
    if let Some(city) = params.city {
        options.insert(CITY_KEY, serde_json::Value::String(city));
    }

    let page = match state
        .aggregator
        .query(&query, &options, params.page.unwrap_or(1), block_size)
        .await
    {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Search '{}' failed: {}", query, e);
            return e.into_response();
        }
    };

    let page_count = page.page_count();
    Json(SearchResponse {
        query: query.raw().to_string(),
        phrases: query.phrases().to_vec(),
        excludes: query.excludes().to_vec(),
        options: query.options().to_vec(),
        limit_reached: query.is_limit_reached(),
        page: page.page,
        per_page: page.per_page,
        total: page.total,
        page_count,
        results: page.results,
    })
    .into_response()
}

/// Provider listing handler
pub async fn providers(State(state): State<AppState>) -> impl IntoResponse {
    let providers: Vec<ProviderResponse> = state
        .aggregator
        .registry()
        .iter()
        .map(|(key, provider)| ProviderResponse {
            key: key.to_string(),
            kind: provider.kind().to_string(),
            category: provider.category().to_string(),
        })
        .collect();

    Json(providers)
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION
    }))
}
