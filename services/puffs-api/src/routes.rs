//! Router assembly.

use axum::{
    routing::{get, post},
    Extension, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::error::method_not_allowed;
use crate::handlers;
use crate::state::AppState;

/// Build the service router. `metrics` is attached when a Prometheus
/// recorder has been installed.
pub fn build_router(state: Arc<AppState>, metrics: Option<PrometheusHandle>) -> Router {
    let mut app = Router::new()
        // Inbound API
        .route(
            "/api/waqi",
            get(handlers::aqi::aqi_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/coordinates",
            post(handlers::coordinates::coordinates_handler).fallback(method_not_allowed),
        )
        .route("/api/places", get(handlers::places::search_handler))
        // Place pages
        .route("/city/:slug", get(handlers::city::city_handler))
        .route("/city/:slug/data", get(handlers::city::city_data_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler));

    if let Some(handle) = metrics {
        app = app.layer(Extension(handle));
    }

    app.layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
