//! Root and Health Check Endpoints
//!
//! - `/` - welcome message
//! - `/health` - plain status
//! - `/health/live` - process liveness
//! - `/health/ready` - storage connectivity
//!
//! No authentication required.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use std::time::Instant;

use crate::db::DbClient;
use crate::state::AppState;
use crate::types::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus, RootResponse};

pub const WELCOME_MESSAGE: &str = "Welcome to the NLP Service API";

/// GET / - Welcome message
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Service greeting", body = RootResponse))
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// GET /health - Plain status
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is responding", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /health/live - Process liveness check
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses((status = 200, description = "Process is alive", body = HealthResponse))
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: Some("Process is alive".to_string()),
        ..HealthResponse::healthy()
    })
}

/// GET /health/ready - Readiness check (storage connectivity)
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Service is not ready", body = HealthResponse)
    )
)]
pub async fn readiness(
    State(db): State<DbClient>,
    State(start_time): State<Instant>,
) -> impl IntoResponse {
    let storage = check_storage(&db).await;
    let status = storage.status;

    let response = HealthResponse {
        status,
        message: None,
        details: Some(HealthDetails {
            storage,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: start_time.elapsed().as_secs(),
        }),
    };

    let code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(response))
}

async fn check_storage(db: &DbClient) -> ComponentHealth {
    let start = Instant::now();
    match db.health_check().await {
        Ok(()) => ComponentHealth {
            status: HealthStatus::Healthy,
            backend: db.backend().to_string(),
            latency_ms: Some(start.elapsed().as_millis() as u64),
            error: None,
        },
        Err(e) => {
            tracing::error!(backend = db.backend(), error = %e, "storage readiness check failed");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                backend: db.backend().to_string(),
                latency_ms: None,
                error: Some("storage unreachable".to_string()),
            }
        }
    }
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
}
