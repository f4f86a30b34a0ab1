use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use db::models::activity_log::ActivityRecord;
use serde::Deserialize;
use util::state::AppState;
use util::ws::ConnectionId;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;
use crate::services::activity::record_and_relay;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateActivityRequest {
    #[validate(length(min = 1, max = 255, message = "Action is required"))]
    pub action: String,
}

/// POST /api/activities
///
/// Record an activity for the authenticated caller. The record is persisted
/// first, then relayed over the real-time channel to every connection except
/// the caller's own socket.
///
/// ### Headers
/// - `X-Connection-Id` (optional): the id from the socket's `ready` frame;
///   names the caller's own connection so the relay skips it.
///
/// ### Request Body
/// ```json
/// { "action": "Exported the Q3 report" }
/// ```
///
/// ### Responses
/// - `201 Created` with the denormalized activity record
/// - `400 Bad Request` (empty action)
/// - `401 Unauthorized`
/// - `500 Internal Server Error`
pub async fn create_activity(
    State(app): State<AppState>,
    AuthUser(claims): AuthUser,
    headers: HeaderMap,
    Json(req): Json<CreateActivityRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Option<ActivityRecord>>::error(
                format_validation_errors(&e),
            )),
        );
    }

    let origin: Option<ConnectionId> = headers
        .get("x-connection-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    match record_and_relay(&app, claims.sub, &req.action, origin).await {
        Ok(activity) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                Some(activity),
                "Activity recorded successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Option<ActivityRecord>>::error(format!(
                "Database error: {}",
                e
            ))),
        ),
    }
}
