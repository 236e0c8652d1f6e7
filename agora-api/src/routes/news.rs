//! News REST routes, keyed by title

use axum::{routing::get, Router};

use super::generic::{crud_handlers, crud_router};
use crate::error::ErrorBody;
use crate::state::AppState;
use crate::types::{CreateNewsRequest, NewsResponse};

crud_handlers! {
    tag: "News",
    response: NewsResponse,
    create: CreateNewsRequest,
    key: String,
    collection: "/api/v1/news",
    item: "/api/v1/news/{title}",
    param: "title",
    handlers: { create: create_news, list: list_news, get: get_news, delete: delete_news },
}

pub fn create_router() -> Router<AppState> {
    crud_router(
        "/news",
        "/news/:title",
        get(list_news).post(create_news),
        get(get_news).delete(delete_news),
    )
}
