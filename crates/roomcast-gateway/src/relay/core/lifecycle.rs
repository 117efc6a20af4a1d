use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::mpsc;

use roomcast_core::error::{Result, RoomcastError};

use super::broadcast::RelayCore;
use super::connection::ConnectionHandle;

/// Connection lifecycle states. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Connecting,
    Open,
    Closed,
}

/// Per-connection three-state machine driving registry/index membership.
///
/// Owned by the connection's task. Ordering matters: registration precedes
/// room join, and room leave precedes deregistration, so a broadcast
/// snapshot never points at a member without a registry entry.
pub struct ConnectionLifecycle {
    core: Arc<RelayCore>,
    room_id: String,
    user_id: String,
    state: ConnState,
    handle: Option<ConnectionHandle>,
}

impl ConnectionLifecycle {
    pub fn new(core: Arc<RelayCore>, room_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            core,
            room_id: room_id.into(),
            user_id: user_id.into(),
            state: ConnState::Connecting,
            handle: None,
        }
    }

    pub fn state(&self) -> ConnState {
        self.state
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// `Connecting -> Open`: register the session, then join the room.
    ///
    /// A previous connection under the same user id is force-disconnected
    /// (last-connection-wins). Malformed identifiers never reach `Open`.
    pub fn open(&mut self, tx: mpsc::Sender<Message>) -> Result<ConnectionHandle> {
        if self.state != ConnState::Connecting {
            return Err(RoomcastError::Internal(format!(
                "open from {:?}",
                self.state
            )));
        }
        if self.room_id.trim().is_empty() || self.user_id.trim().is_empty() {
            return Err(RoomcastError::BadRequest(
                "room_id and user_id must be non-empty".into(),
            ));
        }

        let (handle, displaced) = self.core.sessions.register(&self.user_id, tx);
        if let Some(old) = displaced {
            tracing::warn!(
                user = %self.user_id,
                old_conn = old.conn_id(),
                new_conn = handle.conn_id(),
                "forced disconnect: user reconnected"
            );
            old.request_close();
        }
        self.core.rooms.join(&self.room_id, &self.user_id);

        tracing::info!(room = %self.room_id, user = %self.user_id, conn = handle.conn_id(), "session open");
        self.state = ConnState::Open;
        self.handle = Some(handle.clone());
        Ok(handle)
    }

    /// `Open -> Closed`: leave the room, then deregister (identity-checked).
    /// Closing an already-closed connection is a no-op.
    pub fn close(&mut self) {
        let prev = std::mem::replace(&mut self.state, ConnState::Closed);
        if prev != ConnState::Open {
            return;
        }
        let Some(handle) = self.handle.take() else {
            return;
        };
        handle.invalidate();

        // Leave only while this connection still owns the user's registry
        // entry: a fast reconnect must keep the newer membership intact.
        if self.core.sessions.conn_id_of(&self.user_id) == Some(handle.conn_id()) {
            self.core.rooms.leave(&self.room_id, &self.user_id);
        }
        self.core.sessions.unregister(&self.user_id, handle.conn_id());
        tracing::info!(room = %self.room_id, user = %self.user_id, conn = handle.conn_id(), "session closed");
    }

    /// `Open -> Closed` via the error edge: same cleanup as a normal close,
    /// plus diagnostic detail. The fault is not re-raised past this point.
    pub fn error(&mut self, err: &RoomcastError) {
        if self.state == ConnState::Open {
            tracing::warn!(
                room = %self.room_id,
                user = %self.user_id,
                error = %err,
                code = err.client_code().as_str(),
                "session error"
            );
        }
        self.close();
    }
}
