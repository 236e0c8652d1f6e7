//! Training REST routes

use axum::{routing::get, Router};

use super::generic::{crud_handlers, crud_router};
use crate::error::ErrorBody;
use crate::state::AppState;
use crate::types::{CreateTrainingRequest, TrainingResponse};

crud_handlers! {
    tag: "Training",
    response: TrainingResponse,
    create: CreateTrainingRequest,
    key: String,
    collection: "/api/v1/training",
    item: "/api/v1/training/{title}",
    param: "title",
    handlers: { create: create_training, list: list_training, get: get_training, delete: delete_training },
}

pub fn create_router() -> Router<AppState> {
    crud_router(
        "/training",
        "/training/:title",
        get(list_training).post(create_training),
        get(get_training).delete(delete_training),
    )
}
