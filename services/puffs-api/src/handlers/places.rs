//! Place search.

use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// Maximum number of search results.
pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct PlaceSummary {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub places: Vec<PlaceSummary>,
}

/// GET /api/places?q=
pub async fn search_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let places = state
        .places
        .search(&params.q, SEARCH_LIMIT)
        .into_iter()
        .map(|entry| PlaceSummary {
            name: entry.name.clone(),
            slug: entry.slug(),
        })
        .collect();

    Json(SearchResponse { places })
}
