//! AQI lookup by coordinates.

use axum::{
    extract::{Extension, Query},
    Json,
};
use puffs_common::{AqiReading, Coordinates, FetchOutcome};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, instrument};

use crate::error::ApiError;
use crate::state::AppState;

const MISSING_COORDINATES: &str = "lat and lon query parameters are required";

/// Query parameters for the AQI endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct AqiParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl AqiParams {
    fn coordinates(&self) -> Result<Coordinates, ApiError> {
        fn present(v: &Option<String>) -> Option<&str> {
            v.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        let (Some(lat), Some(lon)) = (present(&self.lat), present(&self.lon)) else {
            return Err(ApiError::BadRequest(MISSING_COORDINATES.to_string()));
        };

        format!("{},{}", lat, lon)
            .parse()
            .map_err(|e: puffs_common::PuffsError| ApiError::BadRequest(e.to_string()))
    }
}

/// GET /api/waqi?lat=..&lon=..
///
/// Answers `{aqi, idx}` on success, 404 when the provider declines the
/// lookup and 500 when the provider cannot be reached or has no token.
#[instrument(skip(state))]
pub async fn aqi_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<AqiParams>,
) -> Result<Json<AqiReading>, ApiError> {
    let coordinates = params.coordinates()?;

    let provider = Arc::clone(&state.provider);
    let outcome = tokio::spawn(async move { provider.fetch_aqi(coordinates).await })
        .await
        .map_err(|e| {
            error!(error = %e, "AQI lookup failed unexpectedly");
            ApiError::Internal(e.to_string())
        })?;

    match outcome {
        FetchOutcome::Success(reading) => Ok(Json(reading)),
        FetchOutcome::ProviderRejected(reason) => Err(ApiError::NotFound(reason)),
        FetchOutcome::ProviderUnavailable(reason) => Err(ApiError::Internal(reason)),
        FetchOutcome::CoordinatesNotFound => Err(ApiError::NotFound(
            puffs_common::messages::COORDINATES_NOT_FOUND.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lat: Option<&str>, lon: Option<&str>) -> AqiParams {
        AqiParams {
            lat: lat.map(String::from),
            lon: lon.map(String::from),
        }
    }

    #[test]
    fn test_coordinates_parsed() {
        let c = params(Some("-12.05"), Some(" -77.11")).coordinates().unwrap();
        assert_eq!(c.latitude, -12.05);
        assert_eq!(c.longitude, -77.11);
    }

    #[test]
    fn test_missing_or_empty_is_bad_request() {
        for p in [
            params(None, Some("1")),
            params(Some("1"), None),
            params(Some(""), Some("1")),
            AqiParams::default(),
        ] {
            match p.coordinates() {
                Err(ApiError::BadRequest(msg)) => assert_eq!(msg, MISSING_COORDINATES),
                other => panic!("expected bad request, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_unparseable_is_bad_request() {
        assert!(matches!(
            params(Some("north"), Some("1")).coordinates(),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            params(Some("91"), Some("0")).coordinates(),
            Err(ApiError::BadRequest(_))
        ));
    }
}
