//! Service configuration loaded from the environment.

use anyhow::{Context, Result};
use puffs_common::{PlaceTable, RenderMode};
use std::path::PathBuf;
use std::time::Duration;

/// Default WAQI API root.
pub const DEFAULT_WAQI_BASE_URL: &str = "https://api.waqi.info";

/// Places pre-built at start-up when nothing else is configured.
pub const DEFAULT_PREWARM: &str = "Callao (Peru)";

/// Outbound WAQI settings.
#[derive(Debug, Clone)]
pub struct WaqiConfig {
    /// API token. Absent means every provider call is reported unavailable.
    pub token: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

/// Outbound geocoding function settings.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub url: Option<String>,
    /// Bearer credential sent with every forwarded request.
    pub key: Option<String>,
    pub timeout: Duration,
}

impl GeocoderConfig {
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.key.is_some()
    }
}

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub waqi: WaqiConfig,
    pub geocoder: GeocoderConfig,

    /// Selected once at start-up from `CLIENT_SIDE_RENDERING`.
    pub render_mode: RenderMode,

    /// Optional YAML place table; the built-in table is used when unset.
    pub places_file: Option<PathBuf>,

    /// Place names built into the page cache at start-up (static mode).
    pub prewarm: Vec<String>,

    /// How long a static page is reused before the pipeline runs again.
    pub revalidate: Duration,

    /// Shorter reuse window for degraded pages.
    pub degraded_revalidate: Duration,

    /// Maximum number of cached static pages.
    pub page_cache_entries: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            waqi: WaqiConfig {
                token: None,
                base_url: DEFAULT_WAQI_BASE_URL.to_string(),
                timeout: Duration::from_secs(30),
            },
            geocoder: GeocoderConfig {
                url: None,
                key: None,
                timeout: Duration::from_secs(30),
            },
            render_mode: RenderMode::Static,
            places_file: None,
            prewarm: vec![DEFAULT_PREWARM.to_string()],
            revalidate: Duration::from_secs(3600),
            degraded_revalidate: Duration::from_secs(60),
            page_cache_entries: 1024,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secs = |key: &str, default: Duration| -> Result<Duration> {
            match get(key) {
                Some(v) => v
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{} must be a whole number of seconds, got {:?}", key, v)),
                None => Ok(default),
            }
        };

        let defaults = Self::default();
        let http_timeout = secs("PUFFS_HTTP_TIMEOUT_SECS", defaults.waqi.timeout)?;

        let client_side = get("CLIENT_SIDE_RENDERING").as_deref() == Some("true");

        let prewarm = match get("PUFFS_PREWARM") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => defaults.prewarm,
        };

        let page_cache_entries = match get("PUFFS_PAGE_CACHE_ENTRIES") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("PUFFS_PAGE_CACHE_ENTRIES must be a number, got {:?}", v))?,
            None => defaults.page_cache_entries,
        };

        Ok(Self {
            waqi: WaqiConfig {
                token: get("WAQI_TOKEN"),
                base_url: get("WAQI_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.waqi.base_url),
                timeout: http_timeout,
            },
            geocoder: GeocoderConfig {
                url: get("GEOCODER_URL"),
                key: get("GEOCODER_KEY"),
                timeout: http_timeout,
            },
            render_mode: RenderMode::from_client_side_flag(client_side),
            places_file: get("PUFFS_PLACES_FILE").map(PathBuf::from),
            prewarm,
            revalidate: secs("PUFFS_REVALIDATE_SECS", defaults.revalidate)?,
            degraded_revalidate: secs(
                "PUFFS_DEGRADED_REVALIDATE_SECS",
                defaults.degraded_revalidate,
            )?,
            page_cache_entries,
        })
    }

    /// Load the place table from `places_file`, or the built-in table.
    pub fn load_places(&self) -> Result<PlaceTable> {
        let table = match &self.places_file {
            Some(path) => PlaceTable::from_yaml_file(path)
                .with_context(|| format!("Failed to load place table: {:?}", path))?,
            None => PlaceTable::builtin().context("Built-in place table is invalid")?,
        };

        tracing::info!(places = table.len(), source = ?self.places_file, "Loaded place table");
        Ok(table)
    }
}
