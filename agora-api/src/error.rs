//! Error Types for the Agora API
//!
//! Every failure leaving the HTTP layer is an [`ApiError`] and is rendered as
//! `{"detail": ...}`. The detail is either a message or a list of field
//! errors. [`ErrorCode`] selects the status code and the log level; it never
//! appears in the body.

use agora_core::{AgoraError, ConfigError, NlpError, StorageError, ValidationError};
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Generic client message for persistence failures.
pub const DATABASE_ERROR_DETAIL: &str = "A database error occurred.";

/// Generic client message for NLP delegate failures.
pub const NLP_ERROR_DETAIL: &str = "NLP processing failed.";

/// Generic client message for everything else.
pub const INTERNAL_ERROR_DETAIL: &str = "An internal server error occurred.";

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error categories. Each maps to exactly one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or invalid bearer token
    Unauthorized,

    /// Request body or path failed field constraints
    ValidationFailed,

    /// Request body could not be parsed at all
    InvalidInput,

    /// Body was not sent as `application/json`
    UnsupportedMediaType,

    /// Natural-key lookup missed
    EntityNotFound,

    /// No route matches the request path
    RouteNotFound,

    /// Route exists but not for this method
    MethodNotAllowed,

    /// Natural key is already taken
    EntityAlreadyExists,

    /// Backing store failed
    DatabaseError,

    /// External NLP call failed or timed out
    NlpProcessingFailed,

    /// Anything else, including panics
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorCode::EntityNotFound | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::EntityAlreadyExists => StatusCode::CONFLICT,
            ErrorCode::DatabaseError
            | ErrorCode::NlpProcessingFailed
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "Could not validate credentials",
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::UnsupportedMediaType => "Expected request with `Content-Type: application/json`",
            ErrorCode::EntityNotFound => "Entity not found",
            ErrorCode::RouteNotFound => "Not Found",
            ErrorCode::MethodNotAllowed => "Method Not Allowed",
            ErrorCode::EntityAlreadyExists => "Entity already exists",
            ErrorCode::DatabaseError => DATABASE_ERROR_DETAIL,
            ErrorCode::NlpProcessingFailed => NLP_ERROR_DETAIL,
            ErrorCode::InternalError => INTERNAL_ERROR_DETAIL,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// FIELD ERRORS
// ============================================================================

/// One rejected field: where it is, what is wrong and the error class.
///
/// `loc` starts with the request part (`body` or `path`) followed by the
/// field path, e.g. `["body", "members", 2]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(value_type = Vec<Object>)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: Vec<serde_json::Value>, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// A field error located in the request body. Dotted `field` paths are
    /// split, and numeric segments become list indices.
    pub fn body(field: &str, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        let mut loc = vec![serde_json::Value::from("body")];
        loc.extend(field.split('.').filter(|s| !s.is_empty()).map(|segment| {
            match segment.parse::<u64>() {
                Ok(index) => serde_json::Value::from(index),
                Err(_) => serde_json::Value::from(segment),
            }
        }));
        Self::new(loc, msg, kind)
    }

    pub fn path(param: &str, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::new(
            vec![serde_json::Value::from("path"), serde_json::Value::from(param)],
            msg,
            kind,
        )
    }
}

impl From<&ValidationError> for FieldError {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::RequiredFieldMissing { field } => {
                FieldError::body(field, "field required", "value_error.missing")
            }
            ValidationError::InvalidValue { field, reason } => {
                FieldError::body(field, reason.clone(), "value_error")
            }
        }
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Body of an error response: a message, or one entry per rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
}

/// The uniform error envelope, `{"detail": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

/// Structured error for API operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Error category; drives status and logging
    pub code: ErrorCode,

    /// What the client sees under `detail`
    pub detail: ErrorDetail,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            detail: ErrorDetail::Message(message.into()),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    /// The message, if this error carries one rather than field errors.
    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            ErrorDetail::Message(message) => Some(message),
            ErrorDetail::Fields(_) => None,
        }
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// `401 Could not validate credentials`.
    pub fn unauthorized() -> Self {
        Self::from_code(ErrorCode::Unauthorized)
    }

    /// 422 carrying one entry per rejected field.
    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            detail: ErrorDetail::Fields(fields),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// `404 <Entity> not found`.
    pub fn entity_not_found(entity_type: impl fmt::Display) -> Self {
        Self::new(ErrorCode::EntityNotFound, format!("{} not found", entity_type))
    }

    pub fn route_not_found() -> Self {
        Self::from_code(ErrorCode::RouteNotFound)
    }

    /// `409 <Entity> already exists`.
    pub fn entity_already_exists(entity_type: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::EntityAlreadyExists,
            format!("{} already exists", entity_type),
        )
    }

    pub fn database_error() -> Self {
        Self::from_code(ErrorCode::DatabaseError)
    }

    pub fn nlp_failed() -> Self {
        Self::from_code(ErrorCode::NlpProcessingFailed)
    }

    pub fn internal_error() -> Self {
        Self::from_code(ErrorCode::InternalError)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            ErrorDetail::Message(message) => write!(f, "{}: {}", self.code, message),
            ErrorDetail::Fields(fields) => {
                write!(f, "{}: {} invalid field(s)", self.code, fields.len())
            }
        }
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if !self.code.is_server_error() {
            tracing::debug!(code = %self.code, status = status.as_u16(), "request rejected");
        }

        let unauthorized = self.code == ErrorCode::Unauthorized;
        let mut response = (status, Json(ErrorBody { detail: self.detail })).into_response();
        if unauthorized {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict { kind, .. } => ApiError::entity_already_exists(kind),
            StorageError::MissingReference { kind, field, key } => {
                ApiError::validation(vec![FieldError::body(
                    field,
                    format!("{} '{}' does not exist", kind, key),
                    "value_error.reference",
                )])
            }
            other => {
                // Log the full error; the client only sees the generic message.
                tracing::error!(error = %other, "storage failure");
                ApiError::database_error()
            }
        }
    }
}

impl From<NlpError> for ApiError {
    fn from(err: NlpError) -> Self {
        tracing::error!(error = %err, "NLP delegate failure");
        ApiError::nlp_failed()
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!(error = %err, "configuration failure");
        ApiError::internal_error()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(vec![FieldError::from(&err)])
    }
}

impl From<Vec<ValidationError>> for ApiError {
    fn from(errs: Vec<ValidationError>) -> Self {
        ApiError::validation(errs.iter().map(FieldError::from).collect())
    }
}

impl From<AgoraError> for ApiError {
    fn from(err: AgoraError) -> Self {
        match err {
            AgoraError::Storage(e) => e.into(),
            AgoraError::Validation(e) => e.into(),
            AgoraError::Nlp(e) => e.into(),
            AgoraError::Config(e) => e.into(),
        }
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::EntityKind;
    use serde_json::json;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::ValidationFailed.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorCode::EntityNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::EntityAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::DatabaseError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorCode::NlpProcessingFailed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let err = ApiError::entity_not_found(EntityKind::Agent);
        assert_eq!(err.code, ErrorCode::EntityNotFound);
        assert_eq!(err.message(), Some("Agent not found"));
    }

    #[test]
    fn test_body_is_detail_only() -> Result<(), serde_json::Error> {
        let body = ErrorBody {
            detail: ApiError::entity_not_found("Role").detail,
        };
        assert_eq!(serde_json::to_value(&body)?, json!({"detail": "Role not found"}));
        Ok(())
    }

    #[test]
    fn test_field_error_location_splits_indices() -> Result<(), serde_json::Error> {
        let err = FieldError::body("members.2", "must not be blank", "value_error");
        assert_eq!(
            serde_json::to_value(&err)?,
            json!({"loc": ["body", "members", 2], "msg": "must not be blank", "type": "value_error"})
        );
        Ok(())
    }

    #[test]
    fn test_storage_failures_hide_cause() {
        let err: ApiError = AgoraError::from(StorageError::Database {
            reason: "relation \"agents\" does not exist".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message(), Some(DATABASE_ERROR_DETAIL));
    }

    #[test]
    fn test_conflict_and_missing_reference_mapping() {
        let conflict: ApiError = StorageError::Conflict {
            kind: EntityKind::Feedback,
            key: "alice".to_string(),
        }
        .into();
        assert_eq!(conflict.message(), Some("Feedback already exists"));
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let missing: ApiError = StorageError::MissingReference {
            kind: EntityKind::Role,
            field: "role",
            key: "pilot".to_string(),
        }
        .into();
        assert_eq!(missing.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        match missing.detail {
            ErrorDetail::Fields(fields) => {
                assert_eq!(fields[0].loc, vec![json!("body"), json!("role")]);
                assert!(fields[0].msg.contains("pilot"));
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_nlp_failure_is_generic() {
        let err: ApiError = AgoraError::from(NlpError::Timeout {
            after: std::time::Duration::from_secs(30),
        })
        .into();
        assert_eq!(err.message(), Some(NLP_ERROR_DETAIL));
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = ApiError::unauthorized().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE),
            Some(&HeaderValue::from_static("Bearer"))
        );
    }
}
