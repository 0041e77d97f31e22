//! Shared helpers for handler tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use crate::config::{test_config, Config};
use crate::models::{Envelope, ItemResponse};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryItemStore;

/// Full application backed by a fresh in-memory store
pub fn test_app() -> (Router, Arc<MemoryItemStore>) {
    test_app_with(&test_config())
}

/// Full application for a specific configuration
pub fn test_app_with(config: &Config) -> (Router, Arc<MemoryItemStore>) {
    let store = Arc::new(MemoryItemStore::new());
    let app = build_router(AppState::new(store.clone(), config), config);
    (app, store)
}

/// Send a request and return the status with the raw body text
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Send a request and parse the JSON response body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let (status, text) = send_raw(app, method, uri, body).await;
    (status, serde_json::from_str(&text).unwrap())
}

/// Create an item through the API and return the stored record
pub async fn create_item(app: &Router, body: JsonValue) -> ItemResponse {
    let (status, json) = send(app, "POST", "/items", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
    let envelope: Envelope<ItemResponse> = serde_json::from_value(json).unwrap();
    envelope.data
}
