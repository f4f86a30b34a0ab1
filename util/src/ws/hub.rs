//! A thread-safe registry of live real-time connections, with per-user
//! broadcast groups and message fan-out.
//!
//! Each connection gets a buffered outbound channel on registration; the
//! caller owns the receiving half and pumps it into the actual socket. A
//! connection may announce at most one user identity, which joins it to that
//! user's group so the user's other tabs can be targeted directly.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, mpsc};

/// Identifier handed to each live connection on registration.
pub type ConnectionId = u64;

/// Outbound frames are pre-serialized JSON strings.
const OUTBOUND_BUFFER: usize = 256;

struct ConnectionEntry {
    user_id: Option<i64>,
    tx: mpsc::Sender<String>,
}

/// Registry of live duplex connections and their announced identities.
///
/// - Connections register anonymously and may announce one user identity.
/// - Announcing joins the per-user group; departing or disconnecting leaves it.
/// - Fan-out pushes a message to every registered sender handle; a full or
///   closed channel drops the frame for that connection only.
///
/// The hub is an injectable value, cheap to clone; nothing here is a
/// process-wide singleton, so tests can run hubs in isolation.
#[derive(Clone, Default)]
pub struct PresenceHub {
    next_id: Arc<AtomicU64>,
    connections: Arc<RwLock<HashMap<ConnectionId, ConnectionEntry>>>,
    groups: Arc<RwLock<HashMap<i64, HashSet<ConnectionId>>>>,
}

impl PresenceHub {
    /// Creates a new, empty `PresenceHub`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection in the unauthenticated state.
    ///
    /// Returns the connection id and the receiver half of its outbound
    /// channel. Dropping the receiver makes subsequent sends to this
    /// connection no-ops; the entry itself is only released by [`remove`].
    ///
    /// [`remove`]: PresenceHub::remove
    pub async fn register(&self) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);
        self.connections
            .write()
            .await
            .insert(id, ConnectionEntry { user_id: None, tx });
        (id, rx)
    }

    /// Associates `conn` with `user_id` and joins the user's group.
    ///
    /// The identity is set once per connection: repeat announcements and
    /// announcements from unknown connections return `false` and change
    /// nothing.
    pub async fn announce(&self, conn: ConnectionId, user_id: i64) -> bool {
        {
            let mut conns = self.connections.write().await;
            match conns.get_mut(&conn) {
                Some(entry) if entry.user_id.is_none() => entry.user_id = Some(user_id),
                _ => return false,
            }
        }
        self.groups
            .write()
            .await
            .entry(user_id)
            .or_default()
            .insert(conn);
        true
    }

    /// Reverses [`announce`] for `conn`: leaves the group and clears the
    /// association. The connection stays registered and may announce again.
    ///
    /// Returns `false` if `conn` is not currently announced as `user_id`.
    ///
    /// [`announce`]: PresenceHub::announce
    pub async fn depart(&self, conn: ConnectionId, user_id: i64) -> bool {
        {
            let mut conns = self.connections.write().await;
            match conns.get_mut(&conn) {
                Some(entry) if entry.user_id == Some(user_id) => entry.user_id = None,
                _ => return false,
            }
        }
        self.leave_group(conn, user_id).await;
        true
    }

    /// Drops `conn` from the registry, running departure bookkeeping first.
    ///
    /// Returns the identity the connection had announced, if any. Calling
    /// this for an unknown connection is a no-op, so every transport error
    /// path can route through it unconditionally.
    pub async fn remove(&self, conn: ConnectionId) -> Option<i64> {
        let entry = self.connections.write().await.remove(&conn)?;
        let user_id = entry.user_id?;
        self.leave_group(conn, user_id).await;
        Some(user_id)
    }

    async fn leave_group(&self, conn: ConnectionId, user_id: i64) {
        let mut groups = self.groups.write().await;
        if let Some(members) = groups.get_mut(&user_id) {
            members.remove(&conn);
            if members.is_empty() {
                groups.remove(&user_id);
            }
        }
    }

    /// Returns the announced identity for `conn`, if any.
    pub async fn user_id_of(&self, conn: ConnectionId) -> Option<i64> {
        self.connections
            .read()
            .await
            .get(&conn)
            .and_then(|e| e.user_id)
    }

    /// `true` while `user_id` has at least one announced connection open.
    /// Multiple tabs collapse to a single group membership.
    pub async fn is_user_present(&self, user_id: i64) -> bool {
        self.groups
            .read()
            .await
            .get(&user_id)
            .is_some_and(|m| !m.is_empty())
    }

    /// Number of registered connections, announced or not.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Pushes `msg` to every registered connection.
    pub async fn broadcast_all(&self, msg: impl Into<String>) {
        let msg = msg.into();
        let conns = self.connections.read().await;
        for (id, entry) in conns.iter() {
            if entry.tx.try_send(msg.clone()).is_err() {
                tracing::debug!(connection = *id, "Dropping frame for slow or closed connection");
            }
        }
    }

    /// Pushes `msg` to a single connection. Unknown ids are a no-op.
    pub async fn send_to(&self, conn: ConnectionId, msg: impl Into<String>) {
        let conns = self.connections.read().await;
        if let Some(entry) = conns.get(&conn) {
            let _ = entry.tx.try_send(msg.into());
        }
    }

    /// Pushes `msg` to every registered connection except `origin`.
    pub async fn broadcast_except(&self, origin: ConnectionId, msg: impl Into<String>) {
        let msg = msg.into();
        let conns = self.connections.read().await;
        for (id, entry) in conns.iter() {
            if *id != origin && entry.tx.try_send(msg.clone()).is_err() {
                tracing::debug!(connection = *id, "Dropping frame for slow or closed connection");
            }
        }
    }

    /// Pushes `msg` to every connection announced for `user_id` (all tabs).
    pub async fn send_to_user(&self, user_id: i64, msg: impl Into<String>) {
        let msg = msg.into();
        let members = match self.groups.read().await.get(&user_id) {
            Some(m) => m.clone(),
            None => return,
        };
        let conns = self.connections.read().await;
        for id in members {
            if let Some(entry) = conns.get(&id) {
                let _ = entry.tx.try_send(msg.clone());
            }
        }
    }
}
