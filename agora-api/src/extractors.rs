//! Request extractors that reject with the uniform error envelope.
//!
//! `ValidatedJson<T>` deserializes and validates a body before the handler
//! runs. `PathKey<K>` parses the natural key from the path.

use crate::error::{ApiError, ErrorCode, FieldError};
use crate::validation::Validate;
use agora_core::ValidationError;
use axum::{
    async_trait,
    extract::{
        rejection::JsonRejection, FromRequest, FromRequestParts, Path, RawPathParams, Request,
    },
    http::request::Parts,
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

/// serde's wording for an absent required field.
static MISSING_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"missing field `([^`]+)`").expect("missing field regex is valid"));

/// JSON body that has passed [`Validate`].
///
/// # Example
///
/// ```rust,ignore
/// async fn create_agent(
///     State(db): State<DbClient>,
///     ValidatedJson(req): ValidatedJson<CreateAgentRequest>,
/// ) -> ApiResult<impl IntoResponse> {
///     // req is well-formed and every field constraint holds
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::from_code(ErrorCode::UnsupportedMediaType)
        }
        JsonRejection::JsonDataError(e) => {
            let text = e.body_text();
            match MISSING_FIELD.captures(&text) {
                Some(field) => ValidationError::RequiredFieldMissing {
                    field: field[1].to_string(),
                }
                .into(),
                None => ApiError::validation(vec![FieldError::body("", text, "type_error")]),
            }
        }
        JsonRejection::JsonSyntaxError(e) => ApiError::validation(vec![FieldError::body(
            "",
            e.body_text(),
            "value_error.jsondecode",
        )]),
        other => ApiError::invalid_input(other.body_text()),
    }
}

/// Natural key (or id) parsed from the single path parameter.
#[derive(Debug, Clone)]
pub struct PathKey<K>(pub K);

#[async_trait]
impl<S, K> FromRequestParts<S> for PathKey<K>
where
    S: Send + Sync,
    K: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let param = RawPathParams::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|params| params.iter().next().map(|(name, _)| name.to_string()))
            .unwrap_or_else(|| "key".to_string());

        let Path(key) = Path::<K>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                ApiError::validation(vec![FieldError::path(&param, e.body_text(), "type_error")])
            })?;
        Ok(PathKey(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorDetail;
    use crate::validation::{ValidateNonEmpty, Violations};
    use axum::body::Body;
    use axum::http::{header, Method, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    impl Validate for Payload {
        fn collect_violations(&self, violations: &mut Violations) {
            violations.check(self.name.validate_non_empty("name"));
        }
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload_passes() {
        let ValidatedJson(payload) = ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"a1"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.name, "a1");
    }

    #[tokio::test]
    async fn test_blank_field_is_422() {
        let err = ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"  "}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_missing_field_is_422_at_body() {
        let err = ValidatedJson::<Payload>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        match err.detail {
            ErrorDetail::Fields(fields) => {
                assert_eq!(fields[0].loc, vec![serde_json::json!("body"), serde_json::json!("name")]);
                assert_eq!(fields[0].msg, "field required");
                assert_eq!(fields[0].kind, "value_error.missing");
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wrong_content_type_is_415() {
        let req = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(Body::from(r#"{"name":"a1"}"#))
            .unwrap();
        let err = ValidatedJson::<Payload>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
