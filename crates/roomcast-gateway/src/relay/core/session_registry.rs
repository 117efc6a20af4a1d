use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;

use super::connection::ConnectionHandle;

/// Session registry: `user_id -> ConnectionHandle`.
///
/// At most one handle per user at any instant, process-wide. A second
/// registration under the same user displaces the first
/// (last-connection-wins). Entries reference the connection's outbound
/// queue; they never own the transport.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, ConnectionHandle>,
    seq: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Insert a fresh handle for `user_id`, displacing any previous one.
    ///
    /// The displaced handle comes back already invalidated so the caller can
    /// log the forced disconnect and notify its task.
    pub fn register(
        &self,
        user_id: &str,
        tx: mpsc::Sender<Message>,
    ) -> (ConnectionHandle, Option<ConnectionHandle>) {
        let conn_id = self.seq.fetch_add(1, Ordering::Relaxed);
        let handle = ConnectionHandle::new(conn_id, tx);
        let displaced = self.sessions.insert(user_id.to_string(), handle.clone());
        if let Some(old) = &displaced {
            old.invalidate();
        }
        (handle, displaced)
    }

    /// Remove the entry only if it is still the caller's own connection.
    /// A late close racing a fast reconnect must not evict the newer handle.
    pub fn unregister(&self, user_id: &str, conn_id: u64) -> bool {
        self.sessions
            .remove_if(user_id, |_, h| h.conn_id() == conn_id)
            .is_some()
    }

    /// Resolve a user's live handle. Invalidated handles are never returned.
    pub fn lookup(&self, user_id: &str) -> Option<ConnectionHandle> {
        self.sessions
            .get(user_id)
            .map(|r| r.value().clone())
            .filter(ConnectionHandle::is_open)
    }

    /// Identity of the handle currently registered for `user_id`, open or not.
    pub fn conn_id_of(&self, user_id: &str) -> Option<u64> {
        self.sessions.get(user_id).map(|r| r.value().conn_id())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
