//! Typed-command dispatch for the real-time presence protocol.

use db::models::session::Model as SessionModel;
use tracing::warn;
use util::{state::AppState, ws::ConnectionId};

use super::{emit, types::WsIn};

/// Handles one inbound command from `conn`.
///
/// Presence changes mutate the hub registry first, then notify the other
/// connections, then refresh the presence count. The count is re-read from
/// the session store on every membership change rather than derived from the
/// registry, so multiple tabs per user and server restarts cannot
/// desynchronize it from persisted truth.
pub async fn handle_command(app: &AppState, conn: ConnectionId, cmd: WsIn) {
    match cmd {
        WsIn::UserConnected { user_id } => {
            if app.hub().announce(conn, user_id).await {
                emit::user_connected(app.hub(), conn, user_id).await;
                refresh_active_count(app).await;
            }
        }
        WsIn::UserDisconnected { user_id } => {
            if app.hub().depart(conn, user_id).await {
                emit::user_disconnected(app.hub(), conn, user_id).await;
                refresh_active_count(app).await;
            }
        }
        WsIn::Ping => emit::pong(app.hub(), conn).await,
    }
}

/// Cleanup for any closed connection, clean or abrupt.
///
/// An announced identity departs exactly as if the client had said goodbye;
/// anonymous connections are dropped silently. Every transport error path
/// must end up here so the registry never retains a dead connection.
pub async fn handle_disconnect(app: &AppState, conn: ConnectionId) {
    if let Some(user_id) = app.hub().remove(conn).await {
        emit::user_disconnected(app.hub(), conn, user_id).await;
        refresh_active_count(app).await;
    }
}

/// Re-reads the presence count from the session store and broadcasts it.
///
/// On storage failure the broadcast is skipped rather than crashing the
/// connection handler; the next membership change self-corrects the count.
/// Two refreshes racing each other can also land out of order, leaving a
/// transiently stale count until the next event. Tolerated: the value is
/// advisory and re-derived from storage every time.
pub async fn refresh_active_count(app: &AppState) {
    match SessionModel::active_user_count(app.db()).await {
        Ok(count) => emit::active_users_updated(app.hub(), count).await,
        Err(e) => {
            warn!(error = %e, "Failed to recompute active users; skipping broadcast");
        }
    }
}
