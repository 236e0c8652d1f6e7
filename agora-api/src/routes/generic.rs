//! Generic CRUD route handlers for Component types.
//!
//! The handler bodies are written once here. Each entity module instantiates
//! them through [`crud_handlers!`], which adds the OpenAPI annotations, and
//! registers the routes with [`crud_router`].
//!
//! # Usage
//!
//! ```ignore
//! crud_handlers! {
//!     tag: "Agents",
//!     response: AgentResponse,
//!     create: CreateAgentRequest,
//!     key: String,
//!     collection: "/api/v1/agents",
//!     item: "/api/v1/agents/{name}",
//!     param: "name",
//!     handlers: { create: create_agent, list: list_agents, get: get_agent, delete: delete_agent },
//! }
//!
//! pub fn create_router() -> Router<AppState> {
//!     crud_router(
//!         "/agents",
//!         "/agents/:name",
//!         get(list_agents).post(create_agent),
//!         get(get_agent).delete(delete_agent),
//!     )
//! }
//! ```

use agora_core::Entity;
use agora_storage::{Repository, Store, UpdateRepository};
use axum::{http::StatusCode, routing::MethodRouter, Json, Router};

use crate::{component::Component, db::DbClient, error::ApiResult, state::AppState};

// ============================================================================
// GENERIC HANDLER HELPERS
// ============================================================================

/// Create an entity and return it with `201 Created`.
pub async fn create_handler<C>(db: DbClient, req: C::Create) -> ApiResult<(StatusCode, Json<C>)>
where
    C: Component,
    dyn Store: Repository<C::Record>,
{
    let entity = db.create::<C>(req).await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

/// Retrieve an entity by natural key, or 404.
pub async fn get_handler<C>(db: DbClient, key: <C::Record as Entity>::Key) -> ApiResult<Json<C>>
where
    C: Component,
    dyn Store: Repository<C::Record>,
{
    let entity = db
        .get::<C>(&key)
        .await?
        .ok_or_else(C::not_found_error)?;
    Ok(Json(entity))
}

/// Replace an entity and return it, or 404.
pub async fn update_handler<C>(
    db: DbClient,
    key: <C::Record as Entity>::Key,
    req: C::Create,
) -> ApiResult<Json<C>>
where
    C: Component,
    dyn Store: UpdateRepository<C::Record>,
{
    let entity = db
        .update::<C>(&key, req)
        .await?
        .ok_or_else(C::not_found_error)?;
    Ok(Json(entity))
}

/// Delete an entity: `204` with an empty body, or 404 if it was absent.
pub async fn delete_handler<C>(db: DbClient, key: <C::Record as Entity>::Key) -> ApiResult<StatusCode>
where
    C: Component,
    dyn Store: Repository<C::Record>,
{
    if db.delete::<C>(&key).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(C::not_found_error())
    }
}

/// Every entity of one kind, in insertion order.
pub async fn list_handler<C>(db: DbClient) -> ApiResult<Json<Vec<C>>>
where
    C: Component,
    dyn Store: Repository<C::Record>,
{
    let entities = db.list::<C>().await?;
    Ok(Json(entities))
}

// ============================================================================
// GENERIC ROUTE FACTORY
// ============================================================================

/// Register the collection path with and without a trailing slash, plus the
/// item path.
pub fn crud_router(
    collection: &str,
    item: &str,
    collection_methods: MethodRouter<AppState>,
    item_methods: MethodRouter<AppState>,
) -> Router<AppState> {
    Router::new()
        .route(collection, collection_methods.clone())
        .route(&format!("{}/", collection), collection_methods)
        .route(item, item_methods)
}

/// Declare the four documented CRUD handlers for one entity.
///
/// Literal arguments are taken as token trees so they reach `utoipa::path`
/// unwrapped. The invoking module must import `ErrorBody` and the request and
/// response types it names.
macro_rules! crud_handlers {
    (
        tag: $tag:tt,
        response: $response:ident,
        create: $create:ident,
        key: $key:ident,
        collection: $collection:tt,
        item: $item:tt,
        param: $param:tt,
        handlers: {
            create: $create_fn:ident,
            list: $list_fn:ident,
            get: $get_fn:ident,
            delete: $delete_fn:ident $(,)?
        } $(,)?
    ) => {
        #[utoipa::path(
            post,
            path = $collection,
            tag = $tag,
            request_body = $create,
            responses(
                (status = 201, description = "Created", body = $response),
                (status = 409, description = "Key already exists", body = ErrorBody),
                (status = 422, description = "Validation failed", body = ErrorBody),
                (status = 500, description = "Database error", body = ErrorBody)
            )
        )]
        pub async fn $create_fn(
            axum::extract::State(db): axum::extract::State<$crate::db::DbClient>,
            $crate::extractors::ValidatedJson(req): $crate::extractors::ValidatedJson<$create>,
        ) -> $crate::error::ApiResult<(axum::http::StatusCode, axum::Json<$response>)> {
            $crate::routes::generic::create_handler::<$response>(db, req).await
        }

        #[utoipa::path(
            get,
            path = $collection,
            tag = $tag,
            responses(
                (status = 200, description = "All records", body = Vec<$response>),
                (status = 500, description = "Database error", body = ErrorBody)
            )
        )]
        pub async fn $list_fn(
            axum::extract::State(db): axum::extract::State<$crate::db::DbClient>,
        ) -> $crate::error::ApiResult<axum::Json<Vec<$response>>> {
            $crate::routes::generic::list_handler::<$response>(db).await
        }

        #[utoipa::path(
            get,
            path = $item,
            tag = $tag,
            params(($param = $key, Path)),
            responses(
                (status = 200, description = "Found", body = $response),
                (status = 404, description = "Not found", body = ErrorBody),
                (status = 500, description = "Database error", body = ErrorBody)
            )
        )]
        pub async fn $get_fn(
            axum::extract::State(db): axum::extract::State<$crate::db::DbClient>,
            $crate::extractors::PathKey(key): $crate::extractors::PathKey<$key>,
        ) -> $crate::error::ApiResult<axum::Json<$response>> {
            $crate::routes::generic::get_handler::<$response>(db, key).await
        }

        #[utoipa::path(
            delete,
            path = $item,
            tag = $tag,
            params(($param = $key, Path)),
            responses(
                (status = 204, description = "Deleted"),
                (status = 404, description = "Not found", body = ErrorBody),
                (status = 500, description = "Database error", body = ErrorBody)
            )
        )]
        pub async fn $delete_fn(
            axum::extract::State(db): axum::extract::State<$crate::db::DbClient>,
            $crate::extractors::PathKey(key): $crate::extractors::PathKey<$key>,
        ) -> $crate::error::ApiResult<axum::http::StatusCode> {
            $crate::routes::generic::delete_handler::<$response>(db, key).await
        }
    };
}

pub(crate) use crud_handlers;
