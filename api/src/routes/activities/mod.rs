//! # activities Routes Module
//!
//! Defines and wires up routes for the `/activities` endpoint group. The
//! parent router requires authentication for the whole group; listing is
//! additionally restricted to managers inside the handler, since it shares
//! its path with creation.

pub mod get;
pub mod post;

use axum::{Router, routing::get};
use util::state::AppState;

use get::list_activities;
use post::create_activity;

/// Builds the `/activities` route group.
///
/// - `GET /activities` → `list_activities` (manager or higher)
/// - `POST /activities` → `create_activity` (any authenticated user)
pub fn activities_routes() -> Router<AppState> {
    Router::new().route("/", get(list_activities).post(create_activity))
}
