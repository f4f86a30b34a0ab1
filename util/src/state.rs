//! Application state container shared across Axum route handlers and the
//! real-time layer.
//!
//! Holds the database connection and the presence hub. It is cheap to clone
//! and is passed into route handlers via Axum's `State<T>` extractor.

use crate::ws::PresenceHub;
use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The `PresenceHub` owning the live connection registry and fan-out.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    hub: PresenceHub,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection and hub.
    pub fn new(db: DatabaseConnection, hub: PresenceHub) -> Self {
        Self { db, hub }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a shared reference to the internal `PresenceHub`.
    pub fn hub(&self) -> &PresenceHub {
        &self.hub
    }

    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    /// Returns a cloned instance of the `PresenceHub`.
    pub fn hub_clone(&self) -> PresenceHub {
        self.hub.clone()
    }
}
