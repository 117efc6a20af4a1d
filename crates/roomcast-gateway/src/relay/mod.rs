//! Room relay runtime for the roomcast gateway.
//!
//! Session registry, room index, broadcast fan-out, and the per-connection
//! lifecycle machine.

pub mod core;
pub mod types;

pub use self::core::{
    ConnState, ConnectionHandle, ConnectionLifecycle, RelayCore, RoomIndex, SessionRegistry,
};
pub use types::{Frame, QoS};
