//! # analytics Routes Module
//!
//! Defines and wires up routes for the `/analytics` endpoint group. The
//! parent router requires manager access; the CSV export additionally
//! requires admin.

pub mod get;

use axum::{Router, middleware::from_fn, routing::get};
use util::state::AppState;

use crate::auth::guards::allow_admin;
use get::{
    export_users_csv, get_activity_stats, get_dashboard_stats, get_role_distribution,
    get_user_growth,
};

/// Builds the `/analytics` route group.
///
/// - `GET /analytics/stats` → `get_dashboard_stats`
/// - `GET /analytics/user-growth` → `get_user_growth`
/// - `GET /analytics/role-distribution` → `get_role_distribution`
/// - `GET /analytics/activity-stats` → `get_activity_stats`
/// - `GET /analytics/export` → `export_users_csv` (admin only)
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_dashboard_stats))
        .route("/user-growth", get(get_user_growth))
        .route("/role-distribution", get(get_role_distribution))
        .route("/activity-stats", get(get_activity_stats))
        .merge(
            Router::new()
                .route("/export", get(export_users_csv))
                .route_layer(from_fn(allow_admin)),
        )
}
