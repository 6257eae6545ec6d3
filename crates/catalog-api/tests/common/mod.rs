//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use catalog_core::event::Event;
use catalog_core::query::PaginationConfig;
use catalog_core::repository::{CollectionRepository, EventRepository};
use catalog_test_support::{FixedClock, InMemoryCollectionRepository, InMemoryEventRepository};
use http_body_util::BodyExt;
use tower::ServiceExt;

use catalog_api::routes;
use catalog_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> FixedClock {
    FixedClock(chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap())
}

/// Build the full app router over an empty in-memory store. Uses the same
/// route structure as `main.rs`.
pub fn build_test_app() -> Router {
    build_test_app_with_events(Vec::new())
}

/// Build the full app router with the given audit events pre-loaded.
pub fn build_test_app_with_events(events: Vec<Event>) -> Router {
    build_test_app_with(
        Arc::new(InMemoryCollectionRepository::new(fixed_clock())),
        Arc::new(InMemoryEventRepository::new(events)),
    )
}

/// Build the full app router over the given repositories.
pub fn build_test_app_with(
    collections: Arc<dyn CollectionRepository>,
    events: Arc<dyn EventRepository>,
) -> Router {
    let app_state = AppState::new(collections, events, PaginationConfig::default());
    routes::router().with_state(app_state)
}

/// Send a request and return status, headers and the JSON body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, headers, json)
}

/// Build a request with a JSON body and optional `If-Match` header.
pub fn json_request(
    method: &str,
    uri: &str,
    if_match: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(etag) = if_match {
        builder = builder.header("if-match", etag);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    send(app, json_request("POST", uri, None, body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    if_match: Option<&str>,
    body: &serde_json::Value,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    send(app, json_request("PUT", uri, if_match, body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let (status, _, json) = send(app, request).await;
    (status, json)
}
