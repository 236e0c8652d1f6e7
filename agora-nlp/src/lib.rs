//! Agora NLP - External Inference Delegate
//!
//! Forwards text to pretrained models hosted behind an inference API and
//! returns their output as-is. [`NlpBackend`] is the seam: one external call
//! per operation. [`NlpService`] puts an explicit timeout around every call and
//! shapes the raw output into the response envelopes the HTTP layer serves.
//! Nothing is retried or cached.

pub mod client;
pub mod config;

pub use client::InferenceClient;
pub use config::NlpConfig;

use agora_core::{AgoraResult, NlpError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// BACKEND TRAIT
// ============================================================================

/// A model runtime. Each method makes exactly one external call and returns
/// the model's raw output.
#[async_trait]
pub trait NlpBackend: Send + Sync {
    async fn sentiment(&self, text: &str) -> AgoraResult<Value>;

    async fn entities(&self, text: &str) -> AgoraResult<Value>;

    async fn translate(&self, text: &str, target_language: &str) -> AgoraResult<Value>;
}

// ============================================================================
// OUTPUTS
// ============================================================================

/// Sentiment classifier output, list or object depending on the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentOutput {
    pub result: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityOutput {
    pub entities: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationOutput {
    pub translated_text: String,
}

/// All three analyses of one text, unwrapped: the raw sentiment output, the
/// entity list and the translated text. Translation only runs when a target
/// language was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedOutput {
    pub sentiment_analysis: Value,
    pub entity_recognition: Vec<Value>,
    pub language_translation: Option<String>,
}

// ============================================================================
// SERVICE
// ============================================================================

/// Timeout-bounded facade over an [`NlpBackend`].
#[derive(Clone)]
pub struct NlpService {
    backend: Arc<dyn NlpBackend>,
    timeout: Duration,
}

impl NlpService {
    pub fn new(backend: Arc<dyn NlpBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Service backed by the hosted inference API described by `config`.
    pub fn from_config(config: &NlpConfig) -> AgoraResult<Self> {
        let client = InferenceClient::new(config)?;
        Ok(Self::new(Arc::new(client), config.timeout))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T>(&self, call: impl Future<Output = AgoraResult<T>>) -> AgoraResult<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(NlpError::Timeout {
                after: self.timeout,
            }
            .into()),
        }
    }

    pub async fn sentiment(&self, text: &str) -> AgoraResult<SentimentOutput> {
        let result = self.bounded(self.backend.sentiment(text)).await?;
        Ok(SentimentOutput { result })
    }

    pub async fn entities(&self, text: &str) -> AgoraResult<EntityOutput> {
        match self.bounded(self.backend.entities(text)).await? {
            Value::Array(entities) => Ok(EntityOutput { entities }),
            other => Err(NlpError::InvalidResponse {
                model: "entity_recognition".to_string(),
                reason: format!("expected a list of entities, got {}", kind_of(&other)),
            }
            .into()),
        }
    }

    pub async fn translate(&self, text: &str, target_language: &str) -> AgoraResult<TranslationOutput> {
        let raw = self
            .bounded(self.backend.translate(text, target_language))
            .await?;
        let translated_text = translation_text(&raw).ok_or_else(|| NlpError::InvalidResponse {
            model: "language_translation".to_string(),
            reason: format!("no translation_text in {}", kind_of(&raw)),
        })?;
        Ok(TranslationOutput { translated_text })
    }

    /// Sentiment and entities concurrently, then translation if requested.
    pub async fn advanced(&self, text: &str, target_language: Option<&str>) -> AgoraResult<AdvancedOutput> {
        let (sentiment, entities) = tokio::try_join!(self.sentiment(text), self.entities(text))?;

        let language_translation = match target_language.map(str::trim) {
            Some(target) if !target.is_empty() => {
                Some(self.translate(text, target).await?.translated_text)
            }
            _ => None,
        };

        Ok(AdvancedOutput {
            sentiment_analysis: sentiment.result,
            entity_recognition: entities.entities,
            language_translation,
        })
    }
}

impl std::fmt::Debug for NlpService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NlpService")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// `[{"translation_text": ..}]` or `{"translation_text": ..}`.
fn translation_text(raw: &Value) -> Option<String> {
    let item = match raw {
        Value::Array(items) => items.first()?,
        other => other,
    };
    item.get("translation_text")?.as_str().map(str::to_string)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::AgoraError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Canned {
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl NlpBackend for Canned {
        async fn sentiment(&self, _text: &str) -> AgoraResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(json!([{"label": "POSITIVE", "score": 0.99}]))
        }

        async fn entities(&self, _text: &str) -> AgoraResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!([{"entity_group": "LOC", "word": "Paris"}]))
        }

        async fn translate(&self, _text: &str, target_language: &str) -> AgoraResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if target_language == "xx" {
                return Ok(json!({"unexpected": true}));
            }
            Ok(json!([{"translation_text": format!("bonjour ({target_language})")}]))
        }
    }

    fn service(backend: Arc<Canned>) -> NlpService {
        NlpService::new(backend, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_sentiment_passes_raw_output_through() {
        let backend = Arc::new(Canned::default());
        let output = service(backend.clone()).sentiment("I love sunny days!").await.unwrap();
        assert_eq!(output.result, json!([{"label": "POSITIVE", "score": 0.99}]));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_translation_extracts_text() {
        let output = service(Arc::new(Canned::default()))
            .translate("hello", "fr")
            .await
            .unwrap();
        assert_eq!(output.translated_text, "bonjour (fr)");
    }

    #[tokio::test]
    async fn test_translation_without_text_is_invalid_response() {
        let err = service(Arc::new(Canned::default()))
            .translate("hello", "xx")
            .await
            .unwrap_err();
        assert!(matches!(err, AgoraError::Nlp(NlpError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out_after_one_call() {
        let backend = Arc::new(Canned {
            delay: Some(Duration::from_secs(5)),
            ..Canned::default()
        });
        let err = service(backend.clone()).sentiment("text").await.unwrap_err();
        assert_eq!(
            err,
            AgoraError::Nlp(NlpError::Timeout {
                after: Duration::from_millis(200)
            })
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_advanced_skips_blank_target_language() {
        let backend = Arc::new(Canned::default());
        let output = service(backend.clone()).advanced("Paris", Some("  ")).await.unwrap();
        assert!(output.language_translation.is_none());
        assert_eq!(output.entity_recognition.len(), 1);
        assert_eq!(output.sentiment_analysis, json!([{"label": "POSITIVE", "score": 0.99}]));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_advanced_translates_when_asked() {
        let output = service(Arc::new(Canned::default()))
            .advanced("Paris", Some("de"))
            .await
            .unwrap();
        assert_eq!(output.language_translation.as_deref(), Some("bonjour (de)"));
    }

    #[test]
    fn test_translation_text_accepts_object_or_list() {
        assert_eq!(
            translation_text(&json!({"translation_text": "hallo"})),
            Some("hallo".to_string())
        );
        assert_eq!(translation_text(&json!([])), None);
        assert_eq!(translation_text(&json!("hallo")), None);
    }
}
