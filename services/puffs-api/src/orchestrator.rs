//! Page data orchestration.
//!
//! For a place identifier the orchestrator either builds the page eagerly
//! (static mode, reused until its revalidation window passes) or hands
//! back an empty shell and leaves the work to a second, consumer-triggered
//! pass (deferred mode). Both modes share the same pipeline:
//! resolve coordinates, fetch one reading, assemble the envelope.
//!
//! Unknown identifiers are rejected before any pipeline work. An
//! unexpected failure inside the pipeline never reaches the caller; it is
//! replaced by a degraded page with a short revalidation window.

use puffs_common::{AqiProvider, FetchOutcome, PageResult, PlaceTable, RenderMode};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::page_cache::PageCache;

/// The identifier is not in the place table.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Place not found: {0}")]
pub struct PlaceNotFound(pub String);

/// Unexpected failure while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline task panicked: {0}")]
    Panicked(String),

    #[error("pipeline task was cancelled")]
    Cancelled,
}

/// A page ready to render.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub result: PageResult,
    /// Revalidation window for static pages; `None` in deferred mode.
    pub revalidate: Option<Duration>,
}

/// Revalidation windows for static pages.
#[derive(Debug, Clone, Copy)]
pub struct Revalidation {
    pub normal: Duration,
    pub degraded: Duration,
}

/// Decides per render mode when the pipeline runs and assembles pages.
pub struct Orchestrator {
    mode: RenderMode,
    places: Arc<PlaceTable>,
    provider: Arc<dyn AqiProvider>,
    cache: PageCache,
    revalidation: Revalidation,
}

impl Orchestrator {
    pub fn new(
        mode: RenderMode,
        places: Arc<PlaceTable>,
        provider: Arc<dyn AqiProvider>,
        cache: PageCache,
        revalidation: Revalidation,
    ) -> Self {
        info!(mode = %mode, places = places.len(), "Orchestrator ready");
        Self {
            mode,
            places,
            provider,
            cache,
            revalidation,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    fn canonical(&self, id: &str) -> Result<String, PlaceNotFound> {
        self.places
            .canonical_name(id)
            .map(String::from)
            .ok_or_else(|| PlaceNotFound(id.to_string()))
    }

    /// Produce the page for `id` according to the configured mode.
    pub async fn page(&self, id: &str) -> Result<RenderedPage, PlaceNotFound> {
        let name = self.canonical(id)?;

        match self.mode {
            RenderMode::ClientDeferred => Ok(RenderedPage {
                result: PageResult::deferred(name),
                revalidate: None,
            }),
            RenderMode::Static => {
                if let Some(cached) = self.cache.get(&name).await {
                    return Ok(RenderedPage {
                        result: cached.result,
                        revalidate: Some(cached.revalidate),
                    });
                }
                Ok(self.build_static(&name).await)
            }
        }
    }

    /// Rebuild the static page for `id` now and store it, ignoring any
    /// cached copy. Used for start-up prewarming.
    pub async fn refresh(&self, id: &str) -> Result<RenderedPage, PlaceNotFound> {
        let name = self.canonical(id)?;
        Ok(self.build_static(&name).await)
    }

    /// The consumer-triggered second pass of deferred mode.
    ///
    /// Runs the same pipeline as static mode, without caching, and returns
    /// the populated envelope.
    pub async fn hydrate(&self, id: &str) -> Result<PageResult, PlaceNotFound> {
        let name = self.canonical(id)?;

        match self.run_isolated(&name, RenderMode::ClientDeferred).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!(place = %name, error = %e, path = "hydrate", "Pipeline failed unexpectedly");
                let mut result = PageResult::degraded(name);
                result.render_mode = RenderMode::ClientDeferred;
                Ok(result)
            }
        }
    }

    async fn build_static(&self, name: &str) -> RenderedPage {
        let (result, revalidate) = match self.run_isolated(name, RenderMode::Static).await {
            Ok(result) => (result, self.revalidation.normal),
            Err(e) => {
                // Distinct from a clean not-found: the place is known but the build failed
                error!(place = %name, error = %e, path = "degraded", "Pipeline failed unexpectedly");
                metrics::counter!("puffs_page_degraded_total").increment(1);
                (PageResult::degraded(name), self.revalidation.degraded)
            }
        };

        self.cache.put(name, result.clone(), revalidate).await;
        debug!(place = %name, revalidate_secs = revalidate.as_secs(), "Static page built");

        RenderedPage {
            result,
            revalidate: Some(revalidate),
        }
    }

    /// Run the pipeline on its own task so a panic is contained.
    async fn run_isolated(&self, name: &str, mode: RenderMode) -> Result<PageResult, PipelineError> {
        let places = Arc::clone(&self.places);
        let provider = Arc::clone(&self.provider);
        let name = name.to_string();

        tokio::spawn(async move { run_pipeline(&places, provider.as_ref(), &name, mode).await })
            .await
            .map_err(|e| {
                if e.is_panic() {
                    PipelineError::Panicked(panic_message(e.into_panic()))
                } else {
                    PipelineError::Cancelled
                }
            })
    }
}

/// Resolve, fetch and assemble one page. At most one provider call;
/// no provider call at all when the coordinates do not resolve.
pub async fn run_pipeline(
    places: &PlaceTable,
    provider: &dyn AqiProvider,
    name: &str,
    mode: RenderMode,
) -> PageResult {
    let Some(place) = places.resolve_place(name) else {
        debug!(place = %name, "Coordinates not found");
        return PageResult::from_outcome(name, None, FetchOutcome::CoordinatesNotFound, mode);
    };

    let outcome = provider.fetch_aqi(place.coordinates).await;
    debug!(place = %name, outcome = outcome.label(), "Provider answered");

    PageResult::from_outcome(name, Some(&place), outcome, mode)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
