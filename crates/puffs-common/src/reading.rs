//! AQI readings and the outcome of a single provider fetch.

use serde::{Deserialize, Serialize};

use crate::messages;
use crate::page::ErrorField;

/// A live AQI reading for one monitoring station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AqiReading {
    pub aqi: i32,

    /// Provider station identifier.
    #[serde(rename = "idx")]
    pub station_id: String,
}

impl AqiReading {
    pub fn new(aqi: i32, station_id: impl Into<String>) -> Self {
        Self {
            aqi,
            station_id: station_id.into(),
        }
    }
}

/// Result of one attempt to obtain a reading for a place.
///
/// Exactly one variant per attempt: a reading and an error are never
/// both present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(AqiReading),
    /// The place identifier did not resolve to coordinates.
    CoordinatesNotFound,
    /// Configuration or transport issue; the provider was not reached
    /// or did not answer.
    ProviderUnavailable(String),
    /// The provider answered but declined or could not locate the station.
    ProviderRejected(String),
}

impl FetchOutcome {
    /// Provider could not be queried because no credential is configured.
    pub fn missing_credential() -> Self {
        FetchOutcome::ProviderUnavailable(messages::TOKEN_NOT_CONFIGURED.to_string())
    }

    /// Provider answered with a non-success status.
    pub fn rejected() -> Self {
        FetchOutcome::ProviderRejected(messages::PROVIDER_REJECTED.to_string())
    }

    /// Transport-level failure (timeout, DNS, reset, undecodable body).
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        FetchOutcome::ProviderUnavailable(format!("WAQI API error: {}", cause))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    pub fn reading(&self) -> Option<&AqiReading> {
        match self {
            FetchOutcome::Success(reading) => Some(reading),
            _ => None,
        }
    }

    /// Field-scoped error for the page envelope, if this outcome is a failure.
    pub fn error(&self) -> Option<(ErrorField, String)> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::CoordinatesNotFound => Some((
                ErrorField::Coordinates,
                messages::COORDINATES_NOT_FOUND.to_string(),
            )),
            FetchOutcome::ProviderUnavailable(reason) | FetchOutcome::ProviderRejected(reason) => {
                Some((ErrorField::Aqi, reason.clone()))
            }
        }
    }

    /// Short label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Success(_) => "success",
            FetchOutcome::CoordinatesNotFound => "coordinates_not_found",
            FetchOutcome::ProviderUnavailable(_) => "unavailable",
            FetchOutcome::ProviderRejected(_) => "rejected",
        }
    }
}
