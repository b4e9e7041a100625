//! WAQI geo-feed client.
//!
//! One HTTP GET per call to `{base}/feed/geo:{lat};{lon}?token=...`.
//! Only `data.aqi` and `data.idx` are kept from the response; all other
//! provider fields are discarded. No retries.

use anyhow::{Context, Result};
use async_trait::async_trait;
use puffs_common::{AqiProvider, AqiReading, Coordinates, FetchOutcome};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::WaqiConfig;

/// Status sentinel the feed uses for a successful lookup.
const STATUS_OK: &str = "ok";

/// Raw feed envelope. `data` is an object on success and a message otherwise.
#[derive(Debug, Deserialize)]
struct FeedResponse {
    status: String,
    #[serde(default)]
    data: Value,
}

/// [`AqiProvider`] backed by the WAQI HTTP API.
pub struct WaqiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl WaqiClient {
    /// Create a client with the configured timeout.
    pub fn new(config: &WaqiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create WAQI HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn feed_url(&self, coordinates: Coordinates) -> String {
        format!(
            "{}/feed/geo:{};{}",
            self.base_url, coordinates.latitude, coordinates.longitude
        )
    }
}

#[async_trait]
impl AqiProvider for WaqiClient {
    #[instrument(skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    async fn fetch_aqi(&self, coordinates: Coordinates) -> FetchOutcome {
        let outcome = match &self.token {
            None => FetchOutcome::missing_credential(),
            Some(token) => self.request(coordinates, token).await,
        };

        metrics::counter!("puffs_provider_requests_total", "outcome" => outcome.label())
            .increment(1);
        outcome
    }
}

impl WaqiClient {
    async fn request(&self, coordinates: Coordinates, token: &str) -> FetchOutcome {
        // The token travels in the query string, so request errors are
        // reported without their URL.
        let url = self.feed_url(coordinates);
        debug!("Querying WAQI feed");

        let response = match self
            .client
            .get(&url)
            .query(&[("token", token)])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                let e = e.without_url();
                warn!(error = %e, "WAQI request failed");
                return FetchOutcome::transport(e);
            }
        };

        let status = response.status();
        match response.json::<FeedResponse>().await {
            Ok(feed) => interpret(feed),
            Err(e) => {
                let e = e.without_url();
                warn!(http_status = %status, error = %e, "WAQI response could not be decoded");
                FetchOutcome::transport(e)
            }
        }
    }
}

/// Map a decoded feed envelope onto an outcome.
fn interpret(feed: FeedResponse) -> FetchOutcome {
    if feed.status != STATUS_OK {
        debug!(status = %feed.status, detail = %feed.data, "WAQI rejected lookup");
        return FetchOutcome::rejected();
    }

    let aqi = feed
        .data
        .get("aqi")
        .and_then(Value::as_i64)
        .and_then(|v| i32::try_from(v).ok());
    let station = match feed.data.get("idx") {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };

    match (aqi, station) {
        (Some(aqi), Some(station)) => FetchOutcome::Success(AqiReading::new(aqi, station)),
        _ => {
            // The feed reports "-" for stations without a current reading
            debug!(data = %feed.data, "WAQI returned no usable reading");
            FetchOutcome::rejected()
        }
    }
}
