//! NLP REST routes. Each forwards the text to the configured model service.

use axum::{extract::State, routing::post, Json, Router};

use crate::error::{ApiResult, ErrorBody};
use crate::extractors::ValidatedJson;
use crate::state::AppState;
use crate::types::{
    AdvancedNlpRequest, AdvancedNlpResponse, EntityRecognitionResponse, SentimentResponse,
    TextRequest, TranslationRequest, TranslationResponse,
};
use agora_nlp::NlpService;

/// Classify the sentiment of a text.
#[utoipa::path(
    post,
    path = "/api/v1/nlp/sentiment_analysis",
    tag = "NLP",
    request_body = TextRequest,
    responses(
        (status = 200, description = "Raw classifier output", body = SentimentResponse),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "NLP processing failed", body = ErrorBody)
    )
)]
pub async fn sentiment_analysis(
    State(nlp): State<NlpService>,
    ValidatedJson(req): ValidatedJson<TextRequest>,
) -> ApiResult<Json<SentimentResponse>> {
    let output = nlp.sentiment(&req.text).await?;
    Ok(Json(output.into()))
}

/// Extract named entities from a text.
#[utoipa::path(
    post,
    path = "/api/v1/nlp/entity_recognition",
    tag = "NLP",
    request_body = TextRequest,
    responses(
        (status = 200, description = "Recognized entities", body = EntityRecognitionResponse),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "NLP processing failed", body = ErrorBody)
    )
)]
pub async fn entity_recognition(
    State(nlp): State<NlpService>,
    ValidatedJson(req): ValidatedJson<TextRequest>,
) -> ApiResult<Json<EntityRecognitionResponse>> {
    let output = nlp.entities(&req.text).await?;
    Ok(Json(output.into()))
}

/// Translate English text into `target_language`.
#[utoipa::path(
    post,
    path = "/api/v1/nlp/language_translation",
    tag = "NLP",
    request_body = TranslationRequest,
    responses(
        (status = 200, description = "Translated text", body = TranslationResponse),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "NLP processing failed", body = ErrorBody)
    )
)]
pub async fn language_translation(
    State(nlp): State<NlpService>,
    ValidatedJson(req): ValidatedJson<TranslationRequest>,
) -> ApiResult<Json<TranslationResponse>> {
    let output = nlp.translate(&req.text, req.target_language.trim()).await?;
    Ok(Json(output.into()))
}

/// Sentiment, entities and (optionally) translation in one call.
#[utoipa::path(
    post,
    path = "/api/v1/nlp/advanced_nlp_features",
    tag = "NLP",
    request_body = AdvancedNlpRequest,
    responses(
        (status = 200, description = "Combined analysis", body = AdvancedNlpResponse),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "NLP processing failed", body = ErrorBody)
    )
)]
pub async fn advanced_nlp_features(
    State(nlp): State<NlpService>,
    ValidatedJson(req): ValidatedJson<AdvancedNlpRequest>,
) -> ApiResult<Json<AdvancedNlpResponse>> {
    let output = nlp.advanced(&req.text, req.target_language.as_deref()).await?;
    Ok(Json(output.into()))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/nlp/sentiment_analysis", post(sentiment_analysis))
        .route("/nlp/entity_recognition", post(entity_recognition))
        .route("/nlp/language_translation", post(language_translation))
        .route("/nlp/advanced_nlp_features", post(advanced_nlp_features))
}
