//! HTTP client for a hosted inference API

use crate::config::NlpConfig;
use crate::NlpBackend;
use agora_core::{AgoraResult, ConfigError, NlpError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Error body returned by the inference API, e.g. `{"error": "Model is loading"}`.
#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

/// Inference API client. One POST per operation, no retries.
pub struct InferenceClient {
    client: Client,
    base_url: Url,
    config: NlpConfig,
}

impl InferenceClient {
    /// Create a client from configuration. The HTTP timeout matches `config.timeout`.
    pub fn new(config: &NlpConfig) -> AgoraResult<Self> {
        let base_url = Url::parse(config.base_url.trim())
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "AGORA_NLP_BASE_URL".to_string(),
                value: config.base_url.clone(),
                reason: "must be an absolute http(s) URL".to_string(),
            })?;

        let client = Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "nlp".to_string(),
                value: config.base_url.clone(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            config: config.clone(),
        })
    }

    /// Run `text` through `model` and return the raw JSON output.
    pub async fn infer(&self, model: &str, text: &str) -> AgoraResult<Value> {
        self.infer_at(model, model.split('/'), text).await
    }

    /// `{base_url}/models/{segments..}`. Each segment is percent-encoded, so
    /// none of them can add path levels, a query or a fragment.
    fn model_url<'a>(
        &self,
        model: &str,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, NlpError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| request_failed(model, 0, "base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .push("models")
            .extend(segments);
        Ok(url)
    }

    async fn infer_at<'a>(
        &self,
        model: &str,
        segments: impl IntoIterator<Item = &'a str>,
        text: &str,
    ) -> AgoraResult<Value> {
        let url = self.model_url(model, segments)?;
        let mut request = self.client.post(url).json(&InferenceRequest { inputs: text });
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                NlpError::Timeout {
                    after: self.config.timeout,
                }
            } else {
                request_failed(model, 0, format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            let body: Value = response
                .json()
                .await
                .map_err(|e| invalid_response(model, format!("Failed to parse response: {}", e)))?;
            tracing::debug!(model, status = status.as_u16(), "inference call succeeded");
            Ok(body)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = match serde_json::from_str::<InferenceError>(&error_text) {
                Ok(api_error) => api_error.error,
                Err(_) => error_text,
            };
            Err(request_failed(model, status.as_u16(), message).into())
        }
    }
}

fn request_failed(model: &str, status: u16, message: String) -> NlpError {
    NlpError::RequestFailed {
        model: model.to_string(),
        status,
        message,
    }
}

fn invalid_response(model: &str, reason: String) -> NlpError {
    NlpError::InvalidResponse {
        model: model.to_string(),
        reason,
    }
}

#[async_trait]
impl NlpBackend for InferenceClient {
    async fn sentiment(&self, text: &str) -> AgoraResult<Value> {
        self.infer(&self.config.sentiment_model, text).await
    }

    async fn entities(&self, text: &str) -> AgoraResult<Value> {
        self.infer(&self.config.ner_model, text).await
    }

    async fn translate(&self, text: &str, target_language: &str) -> AgoraResult<Value> {
        let model = self.config.translation_model(target_language);
        let segments = self.config.translation_model_segments(target_language);
        self.infer_at(&model, segments.iter().map(String::as_str), text)
            .await
    }
}

impl std::fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.config.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::AgoraError;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::routing::post;
    use axum::{Json, Router};
    use secrecy::SecretString;
    use serde_json::json;

    /// Echo server: reports the model it was asked for, the input and whether a token was sent.
    async fn spawn_server() -> String {
        async fn infer(
            Path(model): Path<String>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> (StatusCode, Json<Value>) {
            if model == "broken" {
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"error": "Model broken is currently loading"})),
                );
            }
            let authorized = headers.contains_key("authorization");
            (
                StatusCode::OK,
                Json(json!([{
                    "model": model,
                    "inputs": body["inputs"],
                    "authorized": authorized,
                }])),
            )
        }

        let app = Router::new().route("/models/*model", post(infer));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Catch-all server: answers every request with the raw path and query it saw.
    async fn spawn_catch_all() -> String {
        async fn record(uri: Uri, headers: HeaderMap) -> Json<Value> {
            Json(json!({
                "path": uri.path(),
                "query": uri.query(),
                "authorized": headers.contains_key("authorization"),
            }))
        }

        let app = Router::new().fallback(record);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(base_url: String) -> NlpConfig {
        NlpConfig {
            base_url,
            sentiment_model: "sentiment-model".to_string(),
            ner_model: "org/ner-model".to_string(),
            ..NlpConfig::default()
        }
    }

    #[tokio::test]
    async fn test_sentiment_posts_inputs_to_model() {
        let client = InferenceClient::new(&config(spawn_server().await)).unwrap();
        let output = client.sentiment("I love sunny days!").await.unwrap();
        assert_eq!(output[0]["model"], "sentiment-model");
        assert_eq!(output[0]["inputs"], "I love sunny days!");
        assert_eq!(output[0]["authorized"], false);
    }

    #[tokio::test]
    async fn test_model_ids_with_slashes_and_bearer_token() {
        let mut cfg = config(spawn_server().await);
        cfg.api_token = Some(SecretString::new("hf_test".into()));
        let client = InferenceClient::new(&cfg).unwrap();

        let output = client.entities("Paris").await.unwrap();
        assert_eq!(output[0]["model"], "org/ner-model");
        assert_eq!(output[0]["authorized"], true);

        let output = client.translate("hello", "de").await.unwrap();
        assert_eq!(output[0]["model"], "Helsinki-NLP/opus-mt-en-de");
    }

    #[tokio::test]
    async fn test_target_language_cannot_leave_the_model_path() {
        let mut cfg = config(spawn_catch_all().await);
        cfg.api_token = Some(SecretString::new("s3cret".into()));
        let client = InferenceClient::new(&cfg).unwrap();

        let seen = client
            .translate("hi", "x/../../../admin/delete?all=1")
            .await
            .unwrap();
        let path = seen["path"].as_str().unwrap();
        assert!(path.starts_with("/models/Helsinki-NLP/opus-mt-en-x%2F"), "{path}");
        assert!(!path.contains("/admin"), "{path}");
        assert_eq!(seen["query"], Value::Null);
    }

    #[tokio::test]
    async fn test_base_url_path_is_kept() {
        let base = format!("{}/inference/", spawn_catch_all().await);
        let client = InferenceClient::new(&config(base)).unwrap();
        let seen = client.sentiment("text").await.unwrap();
        assert_eq!(seen["path"], "/inference/models/sentiment-model");
    }

    #[test]
    fn test_relative_base_url_is_config_error() {
        let err = InferenceClient::new(&config("not a url".to_string())).unwrap_err();
        assert!(matches!(
            err,
            AgoraError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_error_status_surfaces_api_message() {
        let client = InferenceClient::new(&config(spawn_server().await)).unwrap();
        let err = client.infer("broken", "text").await.unwrap_err();
        assert_eq!(
            err,
            AgoraError::Nlp(NlpError::RequestFailed {
                model: "broken".to_string(),
                status: 503,
                message: "Model broken is currently loading".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_request_failure() {
        // Port 1 is never listening.
        let client = InferenceClient::new(&config("http://127.0.0.1:1".to_string())).unwrap();
        let err = client.sentiment("text").await.unwrap_err();
        assert!(matches!(
            err,
            AgoraError::Nlp(NlpError::RequestFailed { status: 0, .. })
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut cfg = NlpConfig::default();
        cfg.api_token = Some(SecretString::new("hf_secret".into()));
        let client = InferenceClient::new(&cfg).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("hf_secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
