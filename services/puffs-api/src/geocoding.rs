//! Geocoding function pass-through.
//!
//! Forwards a request body unmodified to the external geocoding function
//! with a fixed bearer credential and hands back the downstream status and
//! JSON body verbatim. The payload is never interpreted.

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::{header, Client};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::GeocoderConfig;

/// Errors from forwarding a geocoding request.
///
/// These are logged but never shown to the caller, who only sees a
/// fixed message.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoder URL or key not configured")]
    NotConfigured,

    #[error("Geocoder request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Geocoder returned a non-JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

/// Downstream response relayed to the caller.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Client for the external geocoding function.
pub struct GeocodingProxy {
    client: Client,
    url: Option<String>,
    key: Option<String>,
}

impl GeocodingProxy {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create geocoder HTTP client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
            key: config.key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.key.is_some()
    }

    /// Forward `body` and relay the downstream answer.
    #[instrument(skip(self, body), fields(body_bytes = body.len()))]
    pub async fn forward(&self, body: Bytes) -> Result<RelayedResponse, GeocodeError> {
        let (Some(url), Some(key)) = (&self.url, &self.key) else {
            return Err(GeocodeError::NotConfigured);
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(key)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        // Relay only JSON; the bytes themselves are passed through untouched
        serde_json::from_slice::<serde_json::Value>(&body)?;

        debug!(status, response_bytes = body.len(), "Geocoder responded");
        Ok(RelayedResponse { status, body })
    }
}
