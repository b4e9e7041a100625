//! Start-up page prewarming.
//!
//! In static mode the configured places are built into the page cache
//! before the first visitor asks for them, so popular pages are served
//! from cache right away. Places are built one after another; the
//! orchestrator contains any failure, so a bad place never stops the run.

use puffs_common::RenderMode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Summary of one prewarm run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WarmReport {
    /// Pages built and cached with a normal revalidation window.
    pub built: usize,
    /// Pages that came out degraded.
    pub degraded: usize,
    /// Names that are not in the place table.
    pub skipped: usize,
}

/// Builds the configured pages into the page cache.
pub struct PageWarmer {
    state: Arc<AppState>,
    places: Vec<String>,
}

impl PageWarmer {
    pub fn new(state: Arc<AppState>, places: Vec<String>) -> Self {
        Self { state, places }
    }

    /// Warmer for the places named in the service configuration.
    pub fn from_config(state: Arc<AppState>) -> Self {
        let places = state.config.prewarm.clone();
        Self::new(state, places)
    }

    /// Build every configured page. Does nothing in deferred mode.
    pub async fn warm_startup(&self) -> WarmReport {
        let mut report = WarmReport::default();

        if self.state.orchestrator.mode() != RenderMode::Static {
            info!("Page prewarming skipped in deferred mode");
            return report;
        }

        info!(places = self.places.len(), "Starting page prewarm");
        let start = Instant::now();

        for name in &self.places {
            match self.state.orchestrator.refresh(name).await {
                Ok(page) if page.result.is_degraded() => {
                    warn!(place = %name, "Prewarmed page is degraded");
                    report.degraded += 1;
                }
                Ok(_) => {
                    debug!(place = %name, "Prewarmed page");
                    report.built += 1;
                }
                Err(e) => {
                    warn!(place = %name, error = %e, "Skipping unknown prewarm place");
                    report.skipped += 1;
                }
            }
        }

        info!(
            built = report.built,
            degraded = report.degraded,
            skipped = report.skipped,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Page prewarm complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use test_utils::{places, StubProvider};

    fn state(mode: RenderMode, provider: Arc<StubProvider>) -> Arc<AppState> {
        let config = ServiceConfig {
            render_mode: mode,
            ..Default::default()
        };
        Arc::new(AppState::with_parts(config, places::sample_table(), provider).unwrap())
    }

    #[tokio::test]
    async fn test_prewarm_fills_cache() {
        let stub = Arc::new(StubProvider::with_aqi(42));
        let state = state(RenderMode::Static, stub.clone());

        let warmer = PageWarmer::new(
            state.clone(),
            vec!["Callao (Peru)".into(), "delhi".into(), places::UNKNOWN.into()],
        );
        let report = warmer.warm_startup().await;

        assert_eq!(
            report,
            WarmReport {
                built: 2,
                degraded: 0,
                skipped: 1
            }
        );
        assert_eq!(stub.calls(), 2);

        // Served from cache afterwards
        state.orchestrator.page("Delhi").await.unwrap();
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn test_prewarm_counts_degraded() {
        let stub = Arc::new(StubProvider::panicking("boom"));
        let state = state(RenderMode::Static, stub);

        let report = PageWarmer::from_config(state).warm_startup().await;
        assert_eq!(report.degraded, 1);
        assert_eq!(report.built, 0);
    }

    #[tokio::test]
    async fn test_prewarm_noop_in_deferred_mode() {
        let stub = Arc::new(StubProvider::with_aqi(42));
        let state = state(RenderMode::ClientDeferred, stub.clone());

        let report = PageWarmer::from_config(state).warm_startup().await;
        assert_eq!(report, WarmReport::default());
        assert_eq!(stub.calls(), 0);
    }
}
