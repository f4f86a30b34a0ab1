use crate::helpers::{get_json_body, json_request, make_test_app, seed_user};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use db::models::activity_log::Model as ActivityLogModel;
use db::models::user::{Model as UserModel, Role};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower::ServiceExt;

struct TestData {
    admin: (UserModel, String),
    manager: (UserModel, String),
    regular: (UserModel, String),
}

async fn setup_test_data(db: &DatabaseConnection) -> TestData {
    TestData {
        admin: seed_user(db, "Admin", "admin@test.com", Role::Admin).await,
        manager: seed_user(db, "Manager", "manager@test.com", Role::Manager).await,
        regular: seed_user(db, "Regular", "regular@test.com", Role::User).await,
    }
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn list_users_as_manager() {
    let (app, state) = make_test_app().await;
    let data = setup_test_data(state.db()).await;

    let response = app
        .oneshot(get_request("/api/users", &data.manager.1))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_json_body(response).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["users"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn list_users_forbidden_for_regular_user() {
    let (app, state) = make_test_app().await;
    let data = setup_test_data(state.db()).await;

    let response = app
        .oneshot(get_request("/api/users", &data.regular.1))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn list_users_requires_token() {
    let (app, _state) = make_test_app().await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/users")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_users_filters_by_role_and_query() {
    let (app, state) = make_test_app().await;
    let data = setup_test_data(state.db()).await;

    let response = app
        .clone()
        .oneshot(get_request("/api/users?role=admin", &data.admin.1))
        .await
        .unwrap();
    let json = get_json_body(response).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["users"][0]["email"], "admin@test.com");

    let response = app
        .clone()
        .oneshot(get_request("/api/users?query=manag", &data.admin.1))
        .await
        .unwrap();
    let json = get_json_body(response).await;
    assert_eq!(json["data"]["total"], 1);

    let response = app
        .oneshot(get_request("/api/users?role=wizard", &data.admin.1))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_user_found_and_missing() {
    let (app, state) = make_test_app().await;
    let data = setup_test_data(state.db()).await;

    let uri = format!("/api/users/{}", data.regular.0.id);
    let response = app
        .clone()
        .oneshot(get_request(&uri, &data.manager.1))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_json_body(response).await;
    assert_eq!(json["data"]["email"], "regular@test.com");

    let response = app
        .oneshot(get_request("/api/users/9999", &data.manager.1))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_status_as_admin_logs_the_actor() {
    let (app, state) = make_test_app().await;
    let data = setup_test_data(state.db()).await;
    let target_id = data.regular.0.id;

    let uri = format!("/api/users/{}/status", target_id);
    let req = json_request("PATCH", &uri, Some(&data.admin.1), json!({ "status": "inactive" }));
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_json_body(response).await;
    assert_eq!(json["data"]["status"], "inactive");

    // The audit entry is attributed to the acting admin, not the target.
    let recent = ActivityLogModel::recent(state.db(), 1).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(
        recent[0].action,
        format!("Updated user {} status to inactive", target_id)
    );
    assert_eq!(recent[0].user_id, data.admin.0.id);
    assert_eq!(recent[0].user_email, "admin@test.com");
    assert_eq!(recent[0].user_role, Role::Admin);
}

#[tokio::test]
async fn update_status_forbidden_for_manager() {
    let (app, state) = make_test_app().await;
    let data = setup_test_data(state.db()).await;

    let uri = format!("/api/users/{}/status", data.regular.0.id);
    let req = json_request("PATCH", &uri, Some(&data.manager.1), json!({ "status": "inactive" }));
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_status_rejects_unknown_values() {
    let (app, state) = make_test_app().await;
    let data = setup_test_data(state.db()).await;

    let uri = format!("/api/users/{}/status", data.regular.0.id);
    let req = json_request("PATCH", &uri, Some(&data.admin.1), json!({ "status": "paused" }));
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_json_body(response).await;
    assert_eq!(json["message"], "Invalid status. Must be active or inactive");
}

#[tokio::test]
async fn update_status_of_missing_user_is_not_found() {
    let (app, state) = make_test_app().await;
    let data = setup_test_data(state.db()).await;

    let req = json_request(
        "PATCH",
        "/api/users/9999/status",
        Some(&data.admin.1),
        json!({ "status": "inactive" }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
