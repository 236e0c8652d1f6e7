//! Agent REST routes

use axum::{routing::get, Router};

use super::generic::{crud_handlers, crud_router};
use crate::error::ErrorBody;
use crate::state::AppState;
use crate::types::{AgentResponse, CreateAgentRequest};

crud_handlers! {
    tag: "Agents",
    response: AgentResponse,
    create: CreateAgentRequest,
    key: String,
    collection: "/api/v1/agents",
    item: "/api/v1/agents/{name}",
    param: "name",
    handlers: { create: create_agent, list: list_agents, get: get_agent, delete: delete_agent },
}

pub fn create_router() -> Router<AppState> {
    crud_router(
        "/agents",
        "/agents/:name",
        get(list_agents).post(create_agent),
        get(get_agent).delete(delete_agent),
    )
}
