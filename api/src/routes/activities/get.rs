use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::activity_log::{ActivityRecord, Model as ActivityLogModel};
use db::models::user::Role;
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::auth::AuthUser;
use crate::auth::guards::has_role_at_least;
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;

const DEFAULT_LIMIT: u64 = 50;

#[derive(Debug, Deserialize, Validate)]
pub struct ListActivitiesQuery {
    pub user_id: Option<i64>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, Default)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityRecord>,
}

/// GET /api/activities
///
/// The most recent activities, newest first, with the actor's name, email
/// and role denormalized onto each record. Requires manager privileges or
/// higher.
///
/// ### Query Parameters
/// - `user_id` (optional): restrict to one actor
/// - `limit` (optional): max records (default: 50, max: 500)
///
/// ### Responses
/// - `200 OK` with `{ activities }`
/// - `400 Bad Request` - Invalid query parameters
/// - `401 Unauthorized` / `403 Forbidden`
/// - `500 Internal Server Error`
pub async fn list_activities(
    State(app): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListActivitiesQuery>,
) -> impl IntoResponse {
    if !has_role_at_least(&user, Role::Manager) {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<ActivitiesResponse>::error(
                "Manager (or higher) access required",
            )),
        );
    }

    if let Err(e) = query.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ActivitiesResponse>::error(
                format_validation_errors(&e),
            )),
        );
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let db = app.db();

    let result = match query.user_id {
        Some(user_id) => ActivityLogModel::by_user(db, user_id, limit).await,
        None => ActivityLogModel::recent(db, limit).await,
    };

    match result {
        Ok(activities) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ActivitiesResponse { activities },
                "Activities retrieved successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<ActivitiesResponse>::error(format!(
                "Database error: {}",
                e
            ))),
        ),
    }
}
