use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::session::Model as SessionModel;
use db::models::user::{Model as UserModel, Role, Status};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::auth::{AuthUser, generate_jwt};
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct AuthUserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub token: String,
    pub expires_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<i64>,
}

impl AuthUserResponse {
    fn new(user: UserModel, token: String, expires_at: String, session_id: Option<i64>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
            status: user.status.to_string(),
            token,
            expires_at,
            session_id,
        }
    }
}

/// POST /auth/register
///
/// Register a new account with the default `user` role.
///
/// ### Request Body
/// ```json
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "password": "strongpassword"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the user payload and a fresh token
/// - `400 Bad Request` (validation failure)
/// - `409 Conflict` (duplicate email)
/// - `500 Internal Server Error`
pub async fn register(
    State(app): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<AuthUserResponse>::error(
                format_validation_errors(&validation_errors),
            )),
        );
    }

    let db = app.db();

    match UserModel::find_by_email(db, &req.email).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::<AuthUserResponse>::error(
                    "A user with this email already exists",
                )),
            );
        }
        Ok(None) => {}
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AuthUserResponse>::error(format!(
                    "Database error: {}",
                    e
                ))),
            );
        }
    }

    match UserModel::create(db, &req.name, &req.email, &req.password, Role::User).await {
        Ok(user) => {
            let (token, expires_at) = generate_jwt(user.id, user.role);
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    AuthUserResponse::new(user, token, expires_at, None),
                    "User registered successfully",
                )),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<AuthUserResponse>::error(format!(
                "Database error: {}",
                e
            ))),
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login
///
/// Authenticate an existing user, open a presence session, and issue a JWT.
///
/// The returned `session_id` identifies the opened session row; the client
/// hands it back to `POST /auth/logout` to close it. Sessions are advisory
/// presence records; an unreturned session simply expires out of the
/// presence window.
///
/// ### Responses
/// - `200 OK` with user payload, token, and `session_id`
/// - `401 Unauthorized` (unknown email or wrong password)
/// - `403 Forbidden` (account is inactive)
/// - `500 Internal Server Error`
pub async fn login(
    State(app): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let db = app.db();

    let user = match UserModel::find_by_email(db, &req.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<AuthUserResponse>::error(
                    "Invalid email or password",
                )),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AuthUserResponse>::error(format!(
                    "Database error: {}",
                    e
                ))),
            );
        }
    };

    if !user.verify_password(&req.password) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<AuthUserResponse>::error(
                "Invalid email or password",
            )),
        );
    }

    if user.status == Status::Inactive {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<AuthUserResponse>::error("Account is inactive")),
        );
    }

    let session = match SessionModel::open(db, user.id).await {
        Ok(session) => session,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AuthUserResponse>::error(format!(
                    "Database error: {}",
                    e
                ))),
            );
        }
    };

    let (token, expires_at) = generate_jwt(user.id, user.role);
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            AuthUserResponse::new(user, token, expires_at, Some(session.id)),
            "Logged in successfully",
        )),
    )
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub session_id: i64,
}

/// POST /auth/logout
///
/// Stamps the logout time on the caller's session. Closing a session only
/// affects presence bookkeeping; the bearer token stays valid until expiry.
///
/// ### Responses
/// - `200 OK`
/// - `401 Unauthorized` (missing or invalid token)
/// - `404 Not Found` (no such session for this user)
/// - `500 Internal Server Error`
pub async fn logout(
    State(app): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<LogoutRequest>,
) -> impl IntoResponse {
    match SessionModel::close(app.db(), req.session_id, claims.sub).await {
        Ok(Some(_)) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Logged out successfully")),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Session not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!("Database error: {}", e))),
        ),
    }
}
