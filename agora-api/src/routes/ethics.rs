//! Ethics REST routes. Records are addressed by id.

use axum::{routing::get, Router};

use super::generic::{crud_handlers, crud_router};
use crate::error::ErrorBody;
use crate::state::AppState;
use crate::types::{CreateEthicsRequest, EthicsResponse};

crud_handlers! {
    tag: "Ethics",
    response: EthicsResponse,
    create: CreateEthicsRequest,
    key: i64,
    collection: "/api/v1/ethics",
    item: "/api/v1/ethics/{id}",
    param: "id",
    handlers: { create: create_ethics, list: list_ethics, get: get_ethics, delete: delete_ethics },
}

pub fn create_router() -> Router<AppState> {
    crud_router(
        "/ethics",
        "/ethics/:id",
        get(list_ethics).post(create_ethics),
        get(get_ethics).delete(delete_ethics),
    )
}
