use axum::{Router, body::Body, http::Request, response::Response};
use db::models::user::{Model as UserModel, Role};
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use util::{AppConfig, state::AppState, ws::PresenceHub};

/// Builds a fresh app router backed by an isolated in-memory database.
///
/// The returned `AppState` shares the database and hub with the router, so
/// tests can seed rows and inspect registry state directly.
pub async fn make_test_app() -> (Router, AppState) {
    AppConfig::set_jwt_secret("test-secret-key");

    let db = setup_test_db().await;
    let app_state = AppState::new(db, PresenceHub::new());

    let router = Router::new()
        .nest("/api", api::routes::routes())
        .nest("/ws", api::ws::ws_routes())
        .with_state(app_state.clone());

    (router, app_state)
}

/// Inserts a user and returns it together with a valid bearer token.
pub async fn seed_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    role: Role,
) -> (UserModel, String) {
    let user = UserModel::create(db, name, email, "password123", role)
        .await
        .expect("Failed to seed user");
    let (token, _) = api::auth::generate_jwt(user.id, user.role);
    (user, token)
}

/// Builds a JSON request with an optional bearer token.
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
