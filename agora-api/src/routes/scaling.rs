//! Scaling strategy REST routes

use axum::{routing::get, Router};

use super::generic::{crud_handlers, crud_router};
use crate::error::ErrorBody;
use crate::state::AppState;
use crate::types::{CreateScalingRequest, ScalingResponse};

crud_handlers! {
    tag: "Scaling",
    response: ScalingResponse,
    create: CreateScalingRequest,
    key: i64,
    collection: "/api/v1/scaling",
    item: "/api/v1/scaling/{id}",
    param: "id",
    handlers: { create: create_scaling, list: list_scaling, get: get_scaling, delete: delete_scaling },
}

pub fn create_router() -> Router<AppState> {
    crud_router(
        "/scaling",
        "/scaling/:id",
        get(list_scaling).post(create_scaling),
        get(get_scaling).delete(delete_scaling),
    )
}
