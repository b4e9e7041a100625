//! Geocoding pass-through against a local fake geocoding function.

use std::sync::{Arc, Mutex};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Method, Request, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use puffs_api::{config::ServiceConfig, routes::build_router, state::AppState};
use puffs_common::RenderMode;
use serde_json::{json, Value};
use test_utils::{base_url, closed_addr, geocode, places, spawn_server, StubProvider};
use tower::ServiceExt;

/// Requests seen by the fake geocoder: (authorization header, body).
type Seen = Arc<Mutex<Vec<(Option<String>, Bytes)>>>;

async fn fake_geocoder(status: StatusCode, body: Value) -> (String, Seen) {
    let seen: Seen = Arc::default();

    let router = Router::new()
        .route(
            "/get-coords",
            post(
                |State((seen, status, body)): State<(Seen, StatusCode, Value)>,
                 headers: HeaderMap,
                 request_body: Bytes| async move {
                    let auth = headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .map(String::from);
                    seen.lock().unwrap().push((auth, request_body));
                    (status, Json(body)).into_response()
                },
            ),
        )
        .with_state((seen.clone(), status, body));

    let addr = spawn_server(router).await;
    (format!("{}/get-coords", base_url(addr)), seen)
}

fn app(geocoder_url: &str) -> Router {
    let mut config = ServiceConfig {
        render_mode: RenderMode::Static,
        ..Default::default()
    };
    config.geocoder.url = Some(geocoder_url.to_string());
    config.geocoder.key = Some("anon-key".to_string());

    let state = AppState::with_parts(
        config,
        places::sample_table(),
        Arc::new(StubProvider::with_aqi(1)),
    )
    .unwrap();
    build_router(Arc::new(state), None)
}

async fn post_json(app: &Router, body: &Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/coordinates")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_relays_body_and_forwards_credential() {
    let (url, seen) = fake_geocoder(StatusCode::OK, geocode::response_body()).await;
    let app = app(&url);

    let response = post_json(&app, &geocode::request_body()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(json_body(response).await, geocode::response_body());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0.as_deref(), Some("Bearer anon-key"));
    let forwarded: Value = serde_json::from_slice(&seen[0].1).unwrap();
    assert_eq!(forwarded, geocode::request_body());
}

#[tokio::test]
async fn test_relays_downstream_status() {
    for status in [StatusCode::CREATED, StatusCode::UNPROCESSABLE_ENTITY, StatusCode::BAD_REQUEST] {
        let body = json!({"error": "query too short", "code": status.as_u16()});
        let (url, _) = fake_geocoder(status, body.clone()).await;

        let response = post_json(&app(&url), &json!({"query": "x"})).await;
        assert_eq!(response.status(), status);
        assert_eq!(json_body(response).await, body);
    }
}

#[tokio::test]
async fn test_transport_failure_is_fixed_500() {
    let url = format!("{}/get-coords", base_url(closed_addr().await));

    let response = post_json(&app(&url), &geocode::request_body()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await, json!({"error": "Failed to fetch coordinates"}));
}

#[tokio::test]
async fn test_non_json_downstream_is_fixed_500() {
    let router = Router::new().route("/get-coords", post(|| async { "not json" }));
    let url = format!("{}/get-coords", base_url(spawn_server(router).await));

    let response = post_json(&app(&url), &geocode::request_body()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await, json!({"error": "Failed to fetch coordinates"}));
}

#[tokio::test]
async fn test_other_methods_are_rejected_without_forwarding() {
    let (url, seen) = fake_geocoder(StatusCode::OK, json!({})).await;
    let app = app(&url);

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/api/coordinates")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
    assert!(seen.lock().unwrap().is_empty());
}
