//! Inference service configuration.

use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_NER_MODEL: &str = "dbmdz/bert-large-cased-finetuned-conll03-english";
pub const DEFAULT_TRANSLATION_MODEL_PREFIX: &str = "Helsinki-NLP/opus-mt-en-";

/// Where the models live and how long a single call may take.
#[derive(Debug, Clone)]
pub struct NlpConfig {
    /// Base URL of the inference API; models are addressed as `{base_url}/models/{model}`
    pub base_url: String,
    /// Bearer token, if the service requires one
    pub api_token: Option<SecretString>,
    pub sentiment_model: String,
    pub ner_model: String,
    /// Prefix completed with the target language code, e.g. `...-en-` + `fr`
    pub translation_model_prefix: String,
    /// Upper bound on one external call
    pub timeout: Duration,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            ner_model: DEFAULT_NER_MODEL.to_string(),
            translation_model_prefix: DEFAULT_TRANSLATION_MODEL_PREFIX.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl NlpConfig {
    /// Load configuration from `AGORA_NLP_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("AGORA_NLP_BASE_URL").unwrap_or(defaults.base_url),
            api_token: std::env::var("AGORA_NLP_API_TOKEN")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|token| SecretString::new(token.into())),
            sentiment_model: std::env::var("AGORA_NLP_SENTIMENT_MODEL")
                .unwrap_or(defaults.sentiment_model),
            ner_model: std::env::var("AGORA_NLP_NER_MODEL").unwrap_or(defaults.ner_model),
            translation_model_prefix: std::env::var("AGORA_NLP_TRANSLATION_MODEL_PREFIX")
                .unwrap_or(defaults.translation_model_prefix),
            timeout: std::env::var("AGORA_NLP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Model id used to translate into `target_language`.
    pub fn translation_model(&self, target_language: &str) -> String {
        format!("{}{}", self.translation_model_prefix, target_language.trim())
    }

    /// Path segments of [`translation_model`](Self::translation_model). The
    /// prefix is split on `/`; the language always stays inside the last
    /// segment, whatever it contains.
    pub fn translation_model_segments(&self, target_language: &str) -> Vec<String> {
        let mut segments: Vec<String> = self
            .translation_model_prefix
            .split('/')
            .map(str::to_string)
            .collect();
        if let Some(last) = segments.last_mut() {
            last.push_str(target_language.trim());
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NlpConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_token.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_translation_model_appends_language() {
        let config = NlpConfig::default();
        assert_eq!(config.translation_model(" fr "), "Helsinki-NLP/opus-mt-en-fr");
    }

    #[test]
    fn test_translation_segments_keep_language_in_one_segment() {
        let config = NlpConfig::default();
        assert_eq!(
            config.translation_model_segments("fr"),
            vec!["Helsinki-NLP", "opus-mt-en-fr"]
        );
        assert_eq!(
            config.translation_model_segments("x/../admin?all=1"),
            vec!["Helsinki-NLP", "opus-mt-en-x/../admin?all=1"]
        );
    }
}
