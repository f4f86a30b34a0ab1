use crate::helpers::{
    connect_ws, expect_silence, get_json_body, make_test_app, next_json, seed_user, send_json,
    spawn_server,
};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use db::models::session::Model as SessionModel;
use db::models::user::Role;
use serde_json::json;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Error;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tower::ServiceExt;

#[tokio::test]
async fn connection_receives_ready_with_its_id() {
    let (app, state) = make_test_app().await;
    let (_, token) = seed_user(state.db(), "Ada", "ada@test.com", Role::User).await;
    let addr = spawn_server(app).await;

    let mut ws = connect_ws(&addr, &token).await;
    let ready = next_json(&mut ws).await;

    assert_eq!(ready["type"], "ready");
    assert!(ready["connection_id"].as_u64().is_some());
    assert_eq!(state.hub().connection_count().await, 1);
}

#[tokio::test]
async fn unauthenticated_upgrade_is_rejected() {
    let (app, _state) = make_test_app().await;
    let addr = spawn_server(app).await;

    let req = format!("ws://{}/ws", addr).into_client_request().unwrap();
    match connect_async(req).await {
        Ok(_) => panic!("unauthenticated client should not connect"),
        Err(Error::Http(resp)) => assert_eq!(resp.status(), 401),
        Err(e) => panic!("unexpected error: {e:?}"),
    }
}

#[tokio::test]
async fn announce_notifies_others_and_broadcasts_stored_count() {
    let (app, state) = make_test_app().await;
    let (alice, alice_token) = seed_user(state.db(), "Alice", "alice@test.com", Role::User).await;
    let (_bob, bob_token) = seed_user(state.db(), "Bob", "bob@test.com", Role::User).await;
    SessionModel::open(state.db(), alice.id).await.unwrap();

    let addr = spawn_server(app).await;
    let mut ws_a = connect_ws(&addr, &alice_token).await;
    let mut ws_b = connect_ws(&addr, &bob_token).await;
    let _ = next_json(&mut ws_a).await; // ready
    let _ = next_json(&mut ws_b).await; // ready

    send_json(&mut ws_a, json!({ "type": "user_connected", "user_id": alice.id })).await;

    // The other connection sees the announcement, then the refreshed count.
    let frame = next_json(&mut ws_b).await;
    assert_eq!(frame["type"], "user_connected");
    assert_eq!(frame["user_id"], alice.id);
    assert!(frame["timestamp"].as_str().is_some());

    let frame = next_json(&mut ws_b).await;
    assert_eq!(frame["type"], "active_users_updated");
    assert_eq!(frame["count"], 1);

    // The announcing connection only sees the count broadcast. The count is
    // read from the session store, not from the number of live sockets.
    let frame = next_json(&mut ws_a).await;
    assert_eq!(frame["type"], "active_users_updated");
    assert_eq!(frame["count"], 1);

    assert!(state.hub().is_user_present(alice.id).await);
}

#[tokio::test]
async fn activity_relay_skips_the_originating_connection() {
    let (app, state) = make_test_app().await;
    let (alice, alice_token) = seed_user(state.db(), "Alice", "alice@test.com", Role::User).await;
    let (_bob, bob_token) = seed_user(state.db(), "Bob", "bob@test.com", Role::User).await;

    let http = app.clone();
    let addr = spawn_server(app).await;
    let mut ws_a = connect_ws(&addr, &alice_token).await;
    let mut ws_b = connect_ws(&addr, &bob_token).await;

    let ready = next_json(&mut ws_a).await;
    let conn_a = ready["connection_id"].as_u64().unwrap();
    let _ = next_json(&mut ws_b).await;

    // Alice records an activity over HTTP, naming her own socket.
    let req = Request::builder()
        .method("POST")
        .uri("/api/activities")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", alice_token))
        .header("X-Connection-Id", conn_a.to_string())
        .body(Body::from(
            json!({ "action": "Deployed the new build" }).to_string(),
        ))
        .unwrap();
    let response = http.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = get_json_body(response).await;
    assert_eq!(body["data"]["user_name"], "Alice");

    // Everyone else gets the denormalized record; the originator gets nothing.
    let frame = next_json(&mut ws_b).await;
    assert_eq!(frame["type"], "activity_created");
    assert_eq!(frame["action"], "Deployed the new build");
    assert_eq!(frame["user_id"], alice.id);
    assert_eq!(frame["user_name"], "Alice");
    assert_eq!(frame["user_email"], "alice@test.com");
    assert_eq!(frame["user_role"], "user");

    expect_silence(&mut ws_a).await;
}

#[tokio::test]
async fn explicit_departure_notifies_and_recounts() {
    let (app, state) = make_test_app().await;
    let (alice, alice_token) = seed_user(state.db(), "Alice", "alice@test.com", Role::User).await;
    let (_bob, bob_token) = seed_user(state.db(), "Bob", "bob@test.com", Role::User).await;
    let session = SessionModel::open(state.db(), alice.id).await.unwrap();

    let addr = spawn_server(app).await;
    let mut ws_a = connect_ws(&addr, &alice_token).await;
    let mut ws_b = connect_ws(&addr, &bob_token).await;
    let _ = next_json(&mut ws_a).await;
    let _ = next_json(&mut ws_b).await;

    send_json(&mut ws_a, json!({ "type": "user_connected", "user_id": alice.id })).await;
    let _ = next_json(&mut ws_b).await; // user_connected
    let _ = next_json(&mut ws_b).await; // active_users_updated
    let _ = next_json(&mut ws_a).await; // active_users_updated

    // The session closes downstream, then the client says goodbye.
    SessionModel::close(state.db(), session.id, alice.id)
        .await
        .unwrap();
    send_json(
        &mut ws_a,
        json!({ "type": "user_disconnected", "user_id": alice.id }),
    )
    .await;

    let frame = next_json(&mut ws_b).await;
    assert_eq!(frame["type"], "user_disconnected");
    assert_eq!(frame["user_id"], alice.id);

    let frame = next_json(&mut ws_b).await;
    assert_eq!(frame["type"], "active_users_updated");
    assert_eq!(frame["count"], 0);

    // The departed connection stays open and still gets count broadcasts.
    let frame = next_json(&mut ws_a).await;
    assert_eq!(frame["type"], "active_users_updated");
    assert_eq!(frame["count"], 0);
    assert!(!state.hub().is_user_present(alice.id).await);
    assert_eq!(state.hub().connection_count().await, 2);
}

#[tokio::test]
async fn abrupt_disconnect_runs_the_departure_path() {
    let (app, state) = make_test_app().await;
    let (alice, alice_token) = seed_user(state.db(), "Alice", "alice@test.com", Role::User).await;
    let (_bob, bob_token) = seed_user(state.db(), "Bob", "bob@test.com", Role::User).await;
    let session = SessionModel::open(state.db(), alice.id).await.unwrap();

    let addr = spawn_server(app).await;
    let mut ws_a = connect_ws(&addr, &alice_token).await;
    let mut ws_b = connect_ws(&addr, &bob_token).await;
    let _ = next_json(&mut ws_a).await;
    let _ = next_json(&mut ws_b).await;

    send_json(&mut ws_a, json!({ "type": "user_connected", "user_id": alice.id })).await;
    let _ = next_json(&mut ws_b).await; // user_connected
    let _ = next_json(&mut ws_b).await; // active_users_updated

    // Close the session downstream, then drop the socket without a goodbye.
    SessionModel::close(state.db(), session.id, alice.id)
        .await
        .unwrap();
    drop(ws_a);

    let frame = next_json(&mut ws_b).await;
    assert_eq!(frame["type"], "user_disconnected");
    assert_eq!(frame["user_id"], alice.id);

    let frame = next_json(&mut ws_b).await;
    assert_eq!(frame["type"], "active_users_updated");
    assert_eq!(frame["count"], 0);

    // The registry retains nothing for the dead connection.
    assert_eq!(state.hub().connection_count().await, 1);
    assert!(!state.hub().is_user_present(alice.id).await);
}

#[tokio::test]
async fn malformed_announce_is_ignored() {
    let (app, state) = make_test_app().await;
    let (_, alice_token) = seed_user(state.db(), "Alice", "alice@test.com", Role::User).await;
    let (_, bob_token) = seed_user(state.db(), "Bob", "bob@test.com", Role::User).await;

    let addr = spawn_server(app).await;
    let mut ws_a = connect_ws(&addr, &alice_token).await;
    let mut ws_b = connect_ws(&addr, &bob_token).await;
    let _ = next_json(&mut ws_a).await;
    let _ = next_json(&mut ws_b).await;

    // Missing user_id and outright garbage both get dropped.
    send_json(&mut ws_a, json!({ "type": "user_connected" })).await;
    send_json(&mut ws_a, json!({ "type": "made_up_event", "x": 1 })).await;
    expect_silence(&mut ws_b).await;

    // The connection stays usable and unauthenticated.
    send_json(&mut ws_a, json!({ "type": "ping" })).await;
    let frame = next_json(&mut ws_a).await;
    assert_eq!(frame["type"], "pong");
}
