//! Feedback REST routes, keyed by user

use axum::{routing::get, Router};

use super::generic::{crud_handlers, crud_router};
use crate::error::ErrorBody;
use crate::state::AppState;
use crate::types::{CreateFeedbackRequest, FeedbackResponse};

crud_handlers! {
    tag: "Feedback",
    response: FeedbackResponse,
    create: CreateFeedbackRequest,
    key: String,
    collection: "/api/v1/feedback",
    item: "/api/v1/feedback/{user}",
    param: "user",
    handlers: { create: create_feedback, list: list_feedback, get: get_feedback, delete: delete_feedback },
}

pub fn create_router() -> Router<AppState> {
    crud_router(
        "/feedback",
        "/feedback/:user",
        get(list_feedback).post(create_feedback),
        get(get_feedback).delete(delete_feedback),
    )
}
