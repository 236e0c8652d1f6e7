//! HTTP Routes
//!
//! Entity and NLP routes are nested under the configured prefix (default
//! `/api/v1`). Root and health probes live at the top level.
//!
//! Every response that does not come from a handler is still rendered in the
//! `{"detail": ...}` envelope: unknown routes, wrong methods and panics.

pub mod agent;
pub mod auth;
pub mod ethics;
pub mod feedback;
pub mod generic;
pub mod group;
pub mod health;
pub mod influence;
pub mod news;
pub mod nlp;
pub mod recommendation;
pub mod role;
pub mod scaling;
pub mod stage;
pub mod task;
pub mod training;

use std::any::Any;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{from_fn, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};

use crate::config::AppConfig;
use crate::error::{ApiError, ErrorCode};
use crate::openapi::ApiDoc;
use crate::state::AppState;
use crate::telemetry::{observability_middleware, REQUEST_ID_HEADER};

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

async fn openapi_json(State(state): State<AppState>) -> impl IntoResponse {
    let mut doc = ApiDoc::with_prefix(&state.api_prefix);
    doc.info.title = state.project_name.to_string();
    Json(doc)
}

// ============================================================================
// FALLBACKS
// ============================================================================

async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}

/// axum answers a known path with the wrong method with an empty 405; give
/// it the envelope, keeping the `Allow` header.
async fn method_not_allowed_envelope(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut normalized = ApiError::from_code(ErrorCode::MethodNotAllowed).into_response();
    if let Some(allow) = allow {
        normalized.headers_mut().insert(header::ALLOW, allow);
    }
    normalized
}

/// Panics become a generic 500; the payload is logged, never returned.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %message, "handler panicked");
    ApiError::internal_error().into_response()
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// With no configured origins every origin is allowed (development).
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(86400));

    if origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(AnyOrigin).allow_headers(AnyOrigin)
    } else {
        tracing::info!("CORS: allowing origins: {:?}", origins);
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins).allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Routes nested under the API prefix.
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(agent::create_router())
        .merge(role::create_router())
        .merge(task::create_router())
        .merge(group::create_router())
        .merge(influence::create_router())
        .merge(stage::create_router())
        .merge(news::create_router())
        .merge(recommendation::create_router())
        .merge(training::create_router())
        .merge(feedback::create_router())
        .merge(ethics::create_router())
        .merge(scaling::create_router())
        .merge(nlp::create_router())
        .merge(auth::create_router())
        .route("/openapi.json", get(openapi_json))
}

/// Create the complete API router.
///
/// Layers, outermost first: CORS, request span and access log, 405
/// envelope, panic catcher.
pub fn create_api_router(state: AppState, config: &AppConfig) -> Router {
    let prefix = config.api_prefix.as_str();
    let state = state.with_api_prefix(prefix);

    let mut router = Router::new().merge(health::create_router());
    router = if prefix.is_empty() {
        router.merge(api_routes())
    } else {
        router.nest(prefix, api_routes())
    };

    #[cfg(feature = "swagger-ui")]
    {
        use utoipa_swagger_ui::SwaggerUi;
        let doc = ApiDoc::with_prefix(prefix);
        router = router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", doc));
    }

    router
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn(method_not_allowed_envelope))
        .layer(from_fn(observability_middleware))
        .layer(build_cors_layer(&config.cors_origins))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_panic_becomes_generic_500() {
        let app: Router = Router::new()
            .route("/boom", get(|| async { panic!("secret panic detail") as () }))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"detail": "An internal server error occurred."})
        );
    }

    #[tokio::test]
    async fn test_wrong_method_gets_envelope_and_allow() {
        let app: Router = Router::new()
            .route("/only-get", get(|| async { "ok" }))
            .layer(from_fn(method_not_allowed_envelope));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/only-get")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(header::ALLOW));
        assert_eq!(body_json(response).await, json!({"detail": "Method Not Allowed"}));
    }
}
