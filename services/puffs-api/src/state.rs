//! Application state for the PuffsIndex API.

use anyhow::Result;
use puffs_common::{AqiProvider, PlaceTable};
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::geocoding::GeocodingProxy;
use crate::orchestrator::{Orchestrator, Revalidation};
use crate::page_cache::PageCache;
use crate::provider::WaqiClient;

/// Shared application state.
pub struct AppState {
    pub config: ServiceConfig,

    /// Static place table, read-only after start-up.
    pub places: Arc<PlaceTable>,

    /// AQI source used by the orchestrator and the AQI endpoint.
    pub provider: Arc<dyn AqiProvider>,

    /// Whether the provider has a credential configured.
    pub provider_configured: bool,

    pub orchestrator: Orchestrator,

    pub geocoder: GeocodingProxy,
}

impl AppState {
    /// Create state from configuration: load the place table and build the
    /// WAQI and geocoder clients.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let places = Arc::new(config.load_places()?);
        let waqi = WaqiClient::new(&config.waqi)?;
        let provider_configured = waqi.has_token();

        if !provider_configured {
            tracing::warn!("WAQI_TOKEN is not set; every AQI lookup will fail");
        }

        Self::assemble(config, places, Arc::new(waqi), provider_configured)
    }

    /// Create state around an existing place table and provider.
    pub fn with_parts(
        config: ServiceConfig,
        places: PlaceTable,
        provider: Arc<dyn AqiProvider>,
    ) -> Result<Self> {
        let provider_configured = config.waqi.token.is_some();
        Self::assemble(config, Arc::new(places), provider, provider_configured)
    }

    fn assemble(
        config: ServiceConfig,
        places: Arc<PlaceTable>,
        provider: Arc<dyn AqiProvider>,
        provider_configured: bool,
    ) -> Result<Self> {
        let geocoder = GeocodingProxy::new(&config.geocoder)?;

        let orchestrator = Orchestrator::new(
            config.render_mode,
            Arc::clone(&places),
            Arc::clone(&provider),
            PageCache::new(config.page_cache_entries),
            Revalidation {
                normal: config.revalidate,
                degraded: config.degraded_revalidate,
            },
        );

        Ok(Self {
            config,
            places,
            provider,
            provider_configured,
            orchestrator,
            geocoder,
        })
    }
}
