//! Geocoding pass-through endpoint.

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// The only failure message a caller of the proxy ever sees.
pub const FETCH_COORDINATES_FAILED: &str = "Failed to fetch coordinates";

/// POST /api/coordinates
///
/// Forwards the body to the geocoding function and relays its status and
/// JSON body unchanged.
pub async fn coordinates_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Response {
    match state.geocoder.forward(body).await {
        Ok(relayed) => {
            metrics::counter!("puffs_geocode_requests_total", "status" => relayed.status.to_string())
                .increment(1);

            let status = StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                relayed.body,
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Geocoding request failed");
            metrics::counter!("puffs_geocode_requests_total", "status" => "error").increment(1);
            ApiError::Internal(FETCH_COORDINATES_FAILED.to_string()).into_response()
        }
    }
}
