use crate::helpers::{get_json_body, json_request, make_test_app, seed_user};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use db::models::session::Model as SessionModel;
use db::models::user::{Model as UserModel, Role, Status};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn register_login_logout_flow() {
    let (app, state) = make_test_app().await;

    // Register
    let req = json_request(
        "POST",
        "/api/auth/register",
        None,
        json!({ "name": "Ada", "email": "Ada@Example.com", "password": "longenough" }),
    );
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["email"], "ada@example.com");
    assert_eq!(json["data"]["role"], "user");
    assert!(json["data"]["token"].as_str().is_some());
    // Registration does not open a session.
    assert_eq!(SessionModel::active_user_count(state.db()).await.unwrap(), 0);

    // Login opens a session
    let req = json_request(
        "POST",
        "/api/auth/login",
        None,
        json!({ "email": "ada@example.com", "password": "longenough" }),
    );
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_json_body(response).await;
    let token = json["data"]["token"].as_str().unwrap().to_string();
    let session_id = json["data"]["session_id"].as_i64().unwrap();
    assert_eq!(SessionModel::active_user_count(state.db()).await.unwrap(), 1);

    // Logout closes it
    let req = json_request(
        "POST",
        "/api/auth/logout",
        Some(&token),
        json!({ "session_id": session_id }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(SessionModel::active_user_count(state.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn register_rejects_duplicate_email_and_short_password() {
    let (app, state) = make_test_app().await;
    seed_user(state.db(), "Taken", "taken@example.com", Role::User).await;

    let req = json_request(
        "POST",
        "/api/auth/register",
        None,
        json!({ "name": "Other", "email": "taken@example.com", "password": "longenough" }),
    );
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let req = json_request(
        "POST",
        "/api/auth/register",
        None,
        json!({ "name": "Short", "email": "short@example.com", "password": "short" }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_json_body(response).await;
    assert_eq!(json["message"], "Password must be at least 8 characters");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (app, state) = make_test_app().await;
    seed_user(state.db(), "Ada", "ada@example.com", Role::User).await;

    let req = json_request(
        "POST",
        "/api/auth/login",
        None,
        json!({ "email": "ada@example.com", "password": "not-the-password" }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = get_json_body(response).await;
    assert_eq!(json["message"], "Invalid email or password");
}

#[tokio::test]
async fn login_rejects_inactive_account() {
    let (app, state) = make_test_app().await;
    let (user, _) = seed_user(state.db(), "Ada", "ada@example.com", Role::User).await;
    UserModel::set_status(state.db(), user.id, Status::Inactive)
        .await
        .unwrap();

    let req = json_request(
        "POST",
        "/api/auth/login",
        None,
        json!({ "email": "ada@example.com", "password": "password123" }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = get_json_body(response).await;
    assert_eq!(json["message"], "Account is inactive");
}

#[tokio::test]
async fn me_returns_the_token_subject() {
    let (app, state) = make_test_app().await;
    let (user, token) = seed_user(state.db(), "Ada", "ada@example.com", Role::Manager).await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_json_body(response).await;
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["email"], "ada@example.com");
    assert_eq!(json["data"]["role"], "manager");

    // Without a token the endpoint rejects.
    let req = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_of_unknown_session_is_not_found() {
    let (app, state) = make_test_app().await;
    let (_, token) = seed_user(state.db(), "Ada", "ada@example.com", Role::User).await;

    let req = json_request(
        "POST",
        "/api/auth/logout",
        Some(&token),
        json!({ "session_id": 424242 }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
