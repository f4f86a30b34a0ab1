use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::user::Entity as UserEntity;
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::UserResponse;

/// GET /auth/me
///
/// Returns the directory record behind the caller's bearer token.
///
/// ### Responses
/// - `200 OK` with the user payload
/// - `401 Unauthorized` (missing or invalid token)
/// - `404 Not Found` (token subject no longer exists)
pub async fn get_me(State(app): State<AppState>, AuthUser(claims): AuthUser) -> impl IntoResponse {
    match UserEntity::find_by_id(claims.sub).one(app.db()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                UserResponse::from(user),
                "User retrieved successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<UserResponse>::error("User not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<UserResponse>::error(format!(
                "Database error: {}",
                e
            ))),
        ),
    }
}
