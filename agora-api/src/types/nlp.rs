//! NLP endpoint types. Model output is passed through untouched.

use agora_nlp::{AdvancedOutput, EntityOutput, SentimentOutput, TranslationOutput};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::validation::{Validate, ValidateLanguageCode, ValidateNonEmpty, Violations};

/// Text to analyse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TextRequest {
    pub text: String,
}

impl Validate for TextRequest {
    fn collect_violations(&self, violations: &mut Violations) {
        violations.check(self.text.validate_non_empty("text"));
    }
}

/// Request to translate English text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TranslationRequest {
    pub text: String,
    /// Target language code, e.g. `fr`
    pub target_language: String,
}

impl Validate for TranslationRequest {
    fn collect_violations(&self, violations: &mut Violations) {
        violations.check(self.text.validate_non_empty("text")).check(
            self.target_language
                .validate_non_empty("target_language")
                .and_then(|()| self.target_language.validate_language_code("target_language")),
        );
    }
}

/// Request for every analysis at once. Translation is skipped when no
/// target language is given; a blank one counts as none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdvancedNlpRequest {
    pub text: String,
    #[serde(default)]
    pub target_language: Option<String>,
}

impl Validate for AdvancedNlpRequest {
    fn collect_violations(&self, violations: &mut Violations) {
        violations.check(self.text.validate_non_empty("text"));
        if let Some(target) = self.target_language.as_deref().filter(|t| !t.trim().is_empty()) {
            violations.check(target.validate_language_code("target_language"));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SentimentResponse {
    /// Raw classifier output
    #[schema(value_type = Object)]
    pub result: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EntityRecognitionResponse {
    #[schema(value_type = Vec<Object>)]
    pub entities: Vec<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TranslationResponse {
    pub translated_text: String,
}

/// The three results side by side, each as the single endpoints would
/// return its inner value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdvancedNlpResponse {
    /// Raw classifier output
    #[schema(value_type = Object)]
    pub sentiment_analysis: JsonValue,
    #[schema(value_type = Vec<Object>)]
    pub entity_recognition: Vec<JsonValue>,
    /// Translated text, or null when no target language was given
    pub language_translation: Option<String>,
}

impl From<SentimentOutput> for SentimentResponse {
    fn from(output: SentimentOutput) -> Self {
        Self {
            result: output.result,
        }
    }
}

impl From<EntityOutput> for EntityRecognitionResponse {
    fn from(output: EntityOutput) -> Self {
        Self {
            entities: output.entities,
        }
    }
}

impl From<TranslationOutput> for TranslationResponse {
    fn from(output: TranslationOutput) -> Self {
        Self {
            translated_text: output.translated_text,
        }
    }
}

impl From<AdvancedOutput> for AdvancedNlpResponse {
    fn from(output: AdvancedOutput) -> Self {
        Self {
            sentiment_analysis: output.sentiment_analysis,
            entity_recognition: output.entity_recognition,
            language_translation: output.language_translation,
        }
    }
}
