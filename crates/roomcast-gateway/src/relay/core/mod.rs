//! Relay core components.
//!
//! Session registry, room membership index, broadcast fan-out, and the
//! per-connection lifecycle machine shared across connection tasks.

mod broadcast;
mod connection;
mod lifecycle;
mod room_index;
mod session_registry;

pub use broadcast::RelayCore;
pub use connection::ConnectionHandle;
pub use lifecycle::{ConnState, ConnectionLifecycle};
pub use room_index::RoomIndex;
pub use session_registry::SessionRegistry;
