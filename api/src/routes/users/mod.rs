//! # users Routes Module
//!
//! Defines and wires up routes for the `/users` endpoint group. The whole
//! group requires manager access (applied by the parent router); status
//! changes additionally require admin.

pub mod get;
pub mod patch;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, patch},
};
use util::state::AppState;

use crate::auth::guards::allow_admin;
use get::{get_user, list_users};
use patch::update_user_status;

/// Builds the `/users` route group.
///
/// - `GET /users` → `list_users`
/// - `GET /users/{user_id}` → `get_user`
/// - `PATCH /users/{user_id}/status` → `update_user_status` (admin only)
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/{user_id}", get(get_user))
        .merge(
            Router::new()
                .route("/{user_id}/status", patch(update_user_status))
                .route_layer(from_fn(allow_admin)),
        )
}
