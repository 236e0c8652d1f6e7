//! Bearer token identity endpoint.

mod support;

use agora_api::generate_jwt_token;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use support::test_app;

fn me_request(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/v1/auth/me");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = test_app();
    let response = app.send(me_request(None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers[header::WWW_AUTHENTICATE], "Bearer");
    assert_eq!(response.body, json!({"detail": "Could not validate credentials"}));
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = test_app();
    let response = app.send(me_request(Some("Bearer not.a.jwt"))).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_names_the_user() {
    let app = test_app();
    let token = generate_jwt_token(&app.auth, "alice").unwrap();
    let response = app
        .send(me_request(Some(&format!("Bearer {}", token))))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"username": "alice"}));
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = test_app();
    let other = agora_api::AuthConfig::default()
        .with_secret(agora_api::JwtSecret::new("some-other-secret-value".to_string()).unwrap());
    let token = generate_jwt_token(&other, "mallory").unwrap();
    let response = app
        .send(me_request(Some(&format!("Bearer {}", token))))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
