//! Stage REST routes

use axum::{routing::get, Router};

use super::generic::{crud_handlers, crud_router};
use crate::error::ErrorBody;
use crate::state::AppState;
use crate::types::{CreateStageRequest, StageResponse};

crud_handlers! {
    tag: "Stages",
    response: StageResponse,
    create: CreateStageRequest,
    key: String,
    collection: "/api/v1/stages",
    item: "/api/v1/stages/{name}",
    param: "name",
    handlers: { create: create_stage, list: list_stages, get: get_stage, delete: delete_stage },
}

pub fn create_router() -> Router<AppState> {
    crud_router(
        "/stages",
        "/stages/:name",
        get(list_stages).post(create_stage),
        get(get_stage).delete(delete_stage),
    )
}
