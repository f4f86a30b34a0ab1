use db::models::activity_log::ActivityRecord;
use serde::{Deserialize, Serialize};
use util::ws::ConnectionId;

/// Inbound frames on the real-time channel.
///
/// Every parsed frame becomes a typed command dispatched to
/// [`handlers::handle_command`]; frames that fail to parse are dropped and
/// the connection keeps its current state.
///
/// [`handlers::handle_command`]: crate::ws::handlers::handle_command
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsIn {
    /// "I am user X": associates this connection with a user identity.
    UserConnected { user_id: i64 },
    /// Intentional departure; the connection itself stays open.
    UserDisconnected { user_id: i64 },
    Ping,
}

/// Outbound frames on the real-time channel.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsOut {
    /// Sent once after the upgrade. The client echoes `connection_id` in the
    /// `X-Connection-Id` header of HTTP calls so relays can skip its socket.
    Ready { connection_id: ConnectionId },
    Pong,
    UserConnected { user_id: i64, timestamp: String },
    UserDisconnected { user_id: i64, timestamp: String },
    ActiveUsersUpdated { count: u64 },
    ActivityCreated {
        #[serde(flatten)]
        activity: ActivityRecord,
    },
}
