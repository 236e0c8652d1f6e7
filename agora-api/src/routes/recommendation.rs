//! Recommendation REST routes

use axum::{routing::get, Router};

use super::generic::{crud_handlers, crud_router};
use crate::error::ErrorBody;
use crate::state::AppState;
use crate::types::{CreateRecommendationRequest, RecommendationResponse};

crud_handlers! {
    tag: "Recommendations",
    response: RecommendationResponse,
    create: CreateRecommendationRequest,
    key: String,
    collection: "/api/v1/recommendations",
    item: "/api/v1/recommendations/{title}",
    param: "title",
    handlers: { create: create_recommendation, list: list_recommendations, get: get_recommendation, delete: delete_recommendation },
}

pub fn create_router() -> Router<AppState> {
    crud_router(
        "/recommendations",
        "/recommendations/:title",
        get(list_recommendations).post(create_recommendation),
        get(get_recommendation).delete(delete_recommendation),
    )
}
