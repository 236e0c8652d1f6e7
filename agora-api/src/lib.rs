//! Agora API - REST layer for the entity registry and NLP service
//!
//! Exposes CRUD endpoints for agents, roles, tasks, groups and the text
//! records (influences, stages, news, recommendations, training, feedback,
//! ethics and scaling), four NLP endpoints backed by an external inference
//! service, a bearer-token identity endpoint and health probes.
//!
//! Every error leaves the service as `{"detail": ...}` with the status its
//! category maps to; see [`error`].

pub mod auth;
pub mod component;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod macros;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use auth::{
    generate_jwt_token, validate_jwt_token, AuthConfig, Claims, CurrentUser, FixedClock, JwtClock,
    JwtSecret, SystemClock,
};
pub use component::Component;
pub use config::{AppConfig, StorageBackend};
pub use db::DbClient;
pub use error::{ApiError, ApiResult, ErrorBody, ErrorCode, ErrorDetail, FieldError};
pub use extractors::{PathKey, ValidatedJson};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::AppState;
pub use types::*;
pub use validation::Validate;
