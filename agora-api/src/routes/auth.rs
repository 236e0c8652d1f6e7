//! Token-decode stub.

use axum::{routing::get, Json, Router};

use crate::auth::CurrentUser;
use crate::error::{ApiResult, ErrorBody};
use crate::state::AppState;
use crate::types::CurrentUserResponse;

/// Return the user named by the bearer token.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid", body = CurrentUserResponse),
        (status = 401, description = "Could not validate credentials", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn current_user(user: CurrentUser) -> ApiResult<Json<CurrentUserResponse>> {
    Ok(Json(CurrentUserResponse {
        username: user.username,
    }))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/auth/me", get(current_user))
}
