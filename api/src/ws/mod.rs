use axum::{Router, middleware::from_fn, routing::get};
use util::state::AppState;

use crate::auth::guards::allow_authenticated;

pub mod emit;
pub mod handlers;
pub mod serve;
pub mod types;

/// Builds the `/ws` route group: a single authenticated upgrade endpoint.
pub fn ws_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(serve::ws_entry))
        .route_layer(from_fn(allow_authenticated))
}
