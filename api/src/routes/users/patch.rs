use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::user::{Model as UserModel, Status};
use serde::Deserialize;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::UserResponse;
use crate::services::activity::record_and_relay;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PATCH /api/users/{user_id}/status
///
/// Toggle a user's account status. Admin only.
///
/// Status is independent of presence: deactivating an account closes none of
/// its sessions, so the user keeps counting towards presence until their
/// session closes on its own.
///
/// The change is recorded as an activity attributed to the acting admin and
/// relayed to all live connections.
///
/// ### Request Body
/// ```json
/// { "status": "inactive" }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated user
/// - `400 Bad Request` (status is not `active` or `inactive`)
/// - `401 Unauthorized` / `403 Forbidden`
/// - `404 Not Found` (user doesn't exist)
/// - `500 Internal Server Error`
pub async fn update_user_status(
    State(app): State<AppState>,
    Path(user_id): Path<i64>,
    AuthUser(claims): AuthUser,
    Json(req): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    let Ok(status) = req.status.parse::<Status>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<UserResponse>::error(
                "Invalid status. Must be active or inactive",
            )),
        );
    };

    match UserModel::set_status(app.db(), user_id, status).await {
        Ok(Some(user)) => {
            let action = format!("Updated user {} status to {}", user_id, status);
            if let Err(e) = record_and_relay(&app, claims.sub, &action, None).await {
                // The status change itself landed; the audit trail catches up
                // with the next successful write.
                tracing::warn!(error = %e, user_id, "Failed to record status-change activity");
            }

            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    UserResponse::from(user),
                    "User status updated successfully",
                )),
            )
        }
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
