//! One-liner broadcast helpers for presence and activity events.
//!
//! Each helper serializes a typed [`WsOut`] frame once and pushes it to the
//! hub's fan-out; the hub itself only ever transports strings.

use chrono::Utc;
use db::models::activity_log::ActivityRecord;
use util::ws::{ConnectionId, PresenceHub};

use super::types::WsOut;

/// Tells every connection except `origin` that a user came online.
pub async fn user_connected(hub: &PresenceHub, origin: ConnectionId, user_id: i64) {
    let msg = WsOut::UserConnected {
        user_id,
        timestamp: Utc::now().to_rfc3339(),
    };
    if let Ok(json) = serde_json::to_string(&msg) {
        hub.broadcast_except(origin, json).await;
    }
}

/// Tells every connection except `origin` that a user went offline.
pub async fn user_disconnected(hub: &PresenceHub, origin: ConnectionId, user_id: i64) {
    let msg = WsOut::UserDisconnected {
        user_id,
        timestamp: Utc::now().to_rfc3339(),
    };
    if let Ok(json) = serde_json::to_string(&msg) {
        hub.broadcast_except(origin, json).await;
    }
}

/// Pushes the freshly recomputed presence count to every connection.
pub async fn active_users_updated(hub: &PresenceHub, count: u64) {
    let msg = WsOut::ActiveUsersUpdated { count };
    if let Ok(json) = serde_json::to_string(&msg) {
        hub.broadcast_all(json).await;
    }
}

/// Relays a persisted activity record to every connection except the
/// originator, which already has the data locally. With no originating
/// connection (server-side producers), everyone gets it.
pub async fn activity_created(
    hub: &PresenceHub,
    origin: Option<ConnectionId>,
    record: &ActivityRecord,
) {
    let msg = WsOut::ActivityCreated {
        activity: record.clone(),
    };
    let Ok(json) = serde_json::to_string(&msg) else {
        return;
    };
    match origin {
        Some(conn) => hub.broadcast_except(conn, json).await,
        None => hub.broadcast_all(json).await,
    }
}

/// Replies to an application-level ping on its own connection.
pub async fn pong(hub: &PresenceHub, conn: ConnectionId) {
    if let Ok(json) = serde_json::to_string(&WsOut::Pong) {
        hub.send_to(conn, json).await;
    }
}
