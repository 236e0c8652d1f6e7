//! Root greeting, health probes and the OpenAPI document.

mod support;

use agora_api::AppConfig;
use axum::http::StatusCode;
use serde_json::json;
use support::{test_app, test_app_with_config};

#[tokio::test]
async fn test_root_greets() {
    let app = test_app();
    let response = app.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["message"].is_string());
}

#[tokio::test]
async fn test_health_is_healthy() {
    let app = test_app();
    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_readiness_reports_storage() {
    let app = test_app();
    let response = app.get("/health/ready").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["details"]["storage"]["backend"], "memory");
    assert_eq!(response.body["details"]["storage"]["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_fails_when_storage_fails() {
    let app = test_app();
    app.store.fail_next(agora_test_utils::StorageError::Pool {
        reason: "pool exhausted".to_string(),
    });
    let response = app.get("/health/ready").await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "unhealthy");
    assert!(!response.body.to_string().contains("pool exhausted"));
}

#[tokio::test]
async fn test_openapi_document_uses_project_name() {
    let app = test_app();
    let response = app.get("/api/v1/openapi.json").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["info"]["title"], "NLP Service API");
    assert!(response.body["paths"]["/api/v1/agents"].is_object());
}

#[tokio::test]
async fn test_openapi_document_follows_configured_prefix() {
    let config = AppConfig {
        api_prefix: "/v2".to_string(),
        ..AppConfig::default()
    };
    let app = test_app_with_config(&config);

    let response = app.get("/v2/openapi.json").await;
    assert_eq!(response.status, StatusCode::OK);
    let paths = response.body["paths"].as_object().expect("paths object");
    assert!(paths.contains_key("/v2/agents/{name}"));
    assert!(paths.contains_key("/health"));
    assert!(!paths.keys().any(|path| path.starts_with("/api/v1")));

    assert_eq!(app.get("/v2/agents").await.status, StatusCode::OK);
    assert_eq!(app.get("/api/v1/agents").await.status, StatusCode::NOT_FOUND);
}
