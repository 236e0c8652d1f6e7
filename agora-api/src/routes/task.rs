//! Task REST routes. Tasks are the one kind that can be updated in place.

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use super::generic::{self, crud_handlers, crud_router};
use crate::db::DbClient;
use crate::error::{ApiResult, ErrorBody};
use crate::extractors::{PathKey, ValidatedJson};
use crate::state::AppState;
use crate::types::{CreateTaskRequest, TaskResponse, UpdateTaskRequest};

crud_handlers! {
    tag: "Tasks",
    response: TaskResponse,
    create: CreateTaskRequest,
    key: String,
    collection: "/api/v1/tasks",
    item: "/api/v1/tasks/{name}",
    param: "name",
    handlers: { create: create_task, list: list_tasks, get: get_task, delete: delete_task },
}

/// Replace every field of a task. The body may rename it.
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{name}",
    tag = "Tasks",
    params(("name" = String, Path, description = "Current task name")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 404, description = "Task not found", body = ErrorBody),
        (status = 409, description = "New name already taken", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "Database error", body = ErrorBody)
    )
)]
pub async fn update_task(
    State(db): State<DbClient>,
    PathKey(name): PathKey<String>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    generic::update_handler::<TaskResponse>(db, name, req).await
}

pub fn create_router() -> Router<AppState> {
    crud_router(
        "/tasks",
        "/tasks/:name",
        get(list_tasks).post(create_task),
        get(get_task).put(update_task).delete(delete_task),
    )
}
