//! Group REST routes. Attached tasks must already exist.

use axum::{routing::get, Router};

use super::generic::{crud_handlers, crud_router};
use crate::error::ErrorBody;
use crate::state::AppState;
use crate::types::{CreateGroupRequest, GroupResponse};

crud_handlers! {
    tag: "Groups",
    response: GroupResponse,
    create: CreateGroupRequest,
    key: String,
    collection: "/api/v1/groups",
    item: "/api/v1/groups/{name}",
    param: "name",
    handlers: { create: create_group, list: list_groups, get: get_group, delete: delete_group },
}

pub fn create_router() -> Router<AppState> {
    crud_router(
        "/groups",
        "/groups/:name",
        get(list_groups).post(create_group),
        get(get_group).delete(delete_group),
    )
}
