//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by domain, each protected via the appropriate access
//! control middleware:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → Register, login, logout, current user (login is public;
//!   logout and `/me` authenticate via the bearer token extractor)
//! - `/users` → User directory (manager or higher; status changes admin-only)
//! - `/activities` → Activity feed (listing manager or higher, creation any
//!   authenticated user)
//! - `/analytics` → Dashboard statistics (manager or higher; CSV export
//!   admin-only)

use crate::auth::guards::{allow_authenticated, allow_manager};
use crate::routes::{
    activities::activities_routes, analytics::analytics_routes, auth::auth_routes,
    health::health_routes, users::users_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod activities;
pub mod analytics;
pub mod auth;
pub mod common;
pub mod health;
pub mod users;

/// Builds the complete application router for all HTTP endpoints.
///
/// The returned router still needs `AppState` supplied via `with_state` by
/// the caller (the binary or a test harness).
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/users", users_routes().route_layer(from_fn(allow_manager)))
        .nest(
            "/activities",
            activities_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/analytics",
            analytics_routes().route_layer(from_fn(allow_manager)),
        )
}
