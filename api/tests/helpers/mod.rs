pub mod app;

pub use app::{get_json_body, json_request, make_test_app, seed_user};
pub use ws::{WsClient, connect_ws, expect_silence, next_json, send_json, spawn_server};
