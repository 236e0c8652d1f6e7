//! Role REST routes

use axum::{routing::get, Router};

use super::generic::{crud_handlers, crud_router};
use crate::error::ErrorBody;
use crate::state::AppState;
use crate::types::{CreateRoleRequest, RoleResponse};

crud_handlers! {
    tag: "Roles",
    response: RoleResponse,
    create: CreateRoleRequest,
    key: String,
    collection: "/api/v1/roles",
    item: "/api/v1/roles/{name}",
    param: "name",
    handlers: { create: create_role, list: list_roles, get: get_role, delete: delete_role },
}

pub fn create_router() -> Router<AppState> {
    crud_router(
        "/roles",
        "/roles/:name",
        get(list_roles).post(create_role),
        get(get_role).delete(delete_role),
    )
}
