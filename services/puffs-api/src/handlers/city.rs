//! Place detail pages.
//!
//! `/city/{slug}` serves the page as the configured render mode produces
//! it. In deferred mode the page is an empty shell and the consumer
//! follows up with `/city/{slug}/data` to run the pipeline.

use axum::{
    extract::{Extension, Path},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

fn cache_control(revalidate: Option<Duration>) -> String {
    match revalidate {
        Some(window) => format!("s-maxage={}, stale-while-revalidate", window.as_secs()),
        None => "no-store".to_string(),
    }
}

/// GET /city/:slug
#[instrument(skip(state))]
pub async fn city_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let page = state.orchestrator.page(&slug).await?;
    let view = page.result.render(page.revalidate);

    Ok((
        [(header::CACHE_CONTROL, cache_control(page.revalidate))],
        Json(view),
    )
        .into_response())
}

/// GET /city/:slug/data
#[instrument(skip(state))]
pub async fn city_data_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let result = state.orchestrator.hydrate(&slug).await?;

    Ok((
        [(header::CACHE_CONTROL, cache_control(None))],
        Json(result.render(None)),
    )
        .into_response())
}
