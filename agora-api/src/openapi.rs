//! OpenAPI document for the Agora API.
//!
//! Generated by utoipa from the route annotations and the wire types. The
//! annotations are written against the default `/api/v1` prefix; the served
//! document is moved under the configured prefix and titled with the
//! configured project name.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::config::DEFAULT_API_PREFIX;
use crate::error::{ErrorBody, ErrorDetail, FieldError};
use crate::types::*;

use crate::routes::{
    agent, auth, ethics, feedback, group, health, influence, news, nlp, recommendation, role,
    scaling, stage, task, training,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "NLP Service API",
        version = "0.1.0",
        description = "Agent, task and content registry with natural-language processing endpoints"
    ),
    tags(
        (name = "Agents", description = "Agent registration"),
        (name = "Roles", description = "Roles agents can take"),
        (name = "Tasks", description = "Actions assigned to agents"),
        (name = "Groups", description = "Agent groups and their tasks"),
        (name = "Influences", description = "Named influences and their effects"),
        (name = "Stages", description = "Process stages"),
        (name = "News", description = "News items"),
        (name = "Recommendations", description = "Recommendations"),
        (name = "Training", description = "Training material"),
        (name = "Feedback", description = "User feedback"),
        (name = "Ethics", description = "Ethical principle sets"),
        (name = "Scaling", description = "Scaling strategies"),
        (name = "NLP", description = "Sentiment, entities and translation"),
        (name = "Auth", description = "Bearer token identity"),
        (name = "Health", description = "Liveness and readiness probes")
    ),
    paths(
        agent::create_agent,
        agent::list_agents,
        agent::get_agent,
        agent::delete_agent,
        role::create_role,
        role::list_roles,
        role::get_role,
        role::delete_role,
        task::create_task,
        task::list_tasks,
        task::get_task,
        task::update_task,
        task::delete_task,
        group::create_group,
        group::list_groups,
        group::get_group,
        group::delete_group,
        influence::create_influence,
        influence::list_influences,
        influence::get_influence,
        influence::delete_influence,
        stage::create_stage,
        stage::list_stages,
        stage::get_stage,
        stage::delete_stage,
        news::create_news,
        news::list_news,
        news::get_news,
        news::delete_news,
        recommendation::create_recommendation,
        recommendation::list_recommendations,
        recommendation::get_recommendation,
        recommendation::delete_recommendation,
        training::create_training,
        training::list_training,
        training::get_training,
        training::delete_training,
        feedback::create_feedback,
        feedback::list_feedback,
        feedback::get_feedback,
        feedback::delete_feedback,
        ethics::create_ethics,
        ethics::list_ethics,
        ethics::get_ethics,
        ethics::delete_ethics,
        scaling::create_scaling,
        scaling::list_scaling,
        scaling::get_scaling,
        scaling::delete_scaling,
        nlp::sentiment_analysis,
        nlp::entity_recognition,
        nlp::language_translation,
        nlp::advanced_nlp_features,
        auth::current_user,
        health::root,
        health::health,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        ErrorBody,
        ErrorDetail,
        FieldError,
        CreateAgentRequest,
        AgentResponse,
        CreateRoleRequest,
        RoleResponse,
        CreateTaskRequest,
        TaskResponse,
        CreateGroupRequest,
        GroupResponse,
        CreateInfluenceRequest,
        InfluenceResponse,
        CreateStageRequest,
        StageResponse,
        CreateNewsRequest,
        NewsResponse,
        CreateRecommendationRequest,
        RecommendationResponse,
        CreateTrainingRequest,
        TrainingResponse,
        CreateFeedbackRequest,
        FeedbackResponse,
        CreateEthicsRequest,
        EthicsResponse,
        CreateScalingRequest,
        ScalingResponse,
        TextRequest,
        TranslationRequest,
        AdvancedNlpRequest,
        SentimentResponse,
        EntityRecognitionResponse,
        TranslationResponse,
        AdvancedNlpResponse,
        RootResponse,
        HealthStatus,
        HealthResponse,
        HealthDetails,
        ComponentHealth,
        CurrentUserResponse,
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

impl ApiDoc {
    /// The document with every API path under `prefix` instead of the
    /// default. Root and health paths are left alone.
    pub fn with_prefix(prefix: &str) -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if prefix != DEFAULT_API_PREFIX {
            let paths = std::mem::take(&mut doc.paths.paths);
            doc.paths.paths = paths
                .into_iter()
                .map(|(path, item)| match path.strip_prefix(DEFAULT_API_PREFIX) {
                    Some(rest) => (format!("{}{}", prefix, rest), item),
                    None => (path, item),
                })
                .collect();
        }
        doc
    }

    /// Generate the document as pretty-printed JSON.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_crud_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/agents"));
        assert!(doc.paths.paths.contains_key("/api/v1/agents/{name}"));
        assert!(doc.paths.paths.contains_key("/api/v1/ethics/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/nlp/sentiment_analysis"));
    }

    #[test]
    fn test_custom_prefix_moves_api_paths_only() {
        let doc = ApiDoc::with_prefix("/v2");
        assert!(doc.paths.paths.contains_key("/v2/agents/{name}"));
        assert!(doc.paths.paths.contains_key("/v2/nlp/advanced_nlp_features"));
        assert!(!doc.paths.paths.keys().any(|path| path.starts_with("/api/v1")));
        assert!(doc.paths.paths.contains_key("/health/ready"));

        let bare = ApiDoc::with_prefix("");
        assert!(bare.paths.paths.contains_key("/agents"));
        assert!(bare.paths.paths.contains_key("/"));
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components present");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_to_json_is_valid_json() {
        let json = ApiDoc::to_json().expect("serializes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parses");
        assert_eq!(value["info"]["title"], "NLP Service API");
    }
}
