//! Influence REST routes

use axum::{routing::get, Router};

use super::generic::{crud_handlers, crud_router};
use crate::error::ErrorBody;
use crate::state::AppState;
use crate::types::{CreateInfluenceRequest, InfluenceResponse};

crud_handlers! {
    tag: "Influences",
    response: InfluenceResponse,
    create: CreateInfluenceRequest,
    key: String,
    collection: "/api/v1/influences",
    item: "/api/v1/influences/{name}",
    param: "name",
    handlers: { create: create_influence, list: list_influences, get: get_influence, delete: delete_influence },
}

pub fn create_router() -> Router<AppState> {
    crud_router(
        "/influences",
        "/influences/:name",
        get(list_influences).post(create_influence),
        get(get_influence).delete(delete_influence),
    )
}
