//! Health, readiness and documentation endpoints.

mod helpers;

use axum::http::StatusCode;
use helpers::{setup_test_app, setup_test_app_with, TestAppOptions};
use serde_json::Value;
use vod_infra::middleware::request_id::REQUEST_ID_HEADER;

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app().await;
    let client = app.client();

    let live = client.get("/live").await;
    assert_eq!(live.status_code(), StatusCode::OK);

    let ready: Value = client.get("/ready").await.json();
    assert_eq!(ready["status"], "ready");

    let health = client.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    let body: Value = health.json();
    assert_eq!(body["documentStore"], "healthy");
    assert_eq!(body["storage"], "healthy");
    assert_eq!(body["storageBackend"], "local");
}

#[tokio::test]
async fn test_readiness_fails_when_document_store_is_down() {
    let app = setup_test_app_with(TestAppOptions {
        fail_persistence: true,
        ..TestAppOptions::default()
    })
    .await;

    let response = app.client().get("/ready").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let spec: Value = app.client().get("/api/openapi.json").await.json();
    assert!(spec["paths"]["/api/v0/videos"].is_object());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/live")
        .add_header(REQUEST_ID_HEADER, "req-42")
        .await;
    assert_eq!(response.header(REQUEST_ID_HEADER), "req-42");
}
