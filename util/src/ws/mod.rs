pub mod hub;

pub use hub::{ConnectionId, PresenceHub};
