//! Shared harness for the API integration tests: the full router over an
//! in-memory store and a scripted NLP backend.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use agora_api::{create_api_router, AppConfig, AppState, AuthConfig, DbClient, JwtSecret};
use agora_test_utils::{MemoryStore, MockNlpBackend, NlpService};
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";

/// A router plus handles on the backends behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub nlp: Arc<MockNlpBackend>,
    pub auth: AuthConfig,
}

/// Decoded response: status, headers and JSON body (`Null` when empty).
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig::default().with_secret(JwtSecret::new(TEST_SECRET.to_string()).expect("secret"))
}

pub fn test_app() -> TestApp {
    test_app_with_nlp(MockNlpBackend::new(), Duration::from_secs(2))
}

pub fn test_app_with_nlp(backend: MockNlpBackend, timeout: Duration) -> TestApp {
    build_test_app(backend, timeout, &AppConfig::default())
}

/// Full router mounted the way `config` says.
pub fn test_app_with_config(config: &AppConfig) -> TestApp {
    build_test_app(MockNlpBackend::new(), Duration::from_secs(2), config)
}

fn build_test_app(backend: MockNlpBackend, timeout: Duration, config: &AppConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let nlp = Arc::new(backend);
    let auth = test_auth_config();

    let state = AppState::new(
        DbClient::new(store.clone()),
        NlpService::new(nlp.clone(), timeout),
        auth.clone(),
    );
    let router = create_api_router(state, config);

    TestApp {
        router,
        store,
        nlp,
        auth,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        decode(response).await
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }
}

async fn decode(response: Response) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is JSON")
    };
    TestResponse {
        status,
        headers,
        body,
    }
}
