use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::mpsc;

use roomcast_core::error::{Result, RoomcastError};

/// One live connection's outbound queue plus its registry identity.
///
/// Cloned freely; all clones share the open flag. The socket itself stays
/// with the connection's own task; holders of a handle can only enqueue
/// frames, never touch the transport.
#[derive(Clone, Debug)]
pub struct ConnectionHandle {
    conn_id: u64,
    tx: mpsc::Sender<Message>,
    open: Arc<AtomicBool>,
}

impl ConnectionHandle {
    pub(crate) fn new(conn_id: u64, tx: mpsc::Sender<Message>) -> Self {
        Self {
            conn_id,
            tx,
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Registry identity, used for identity-checked removal.
    pub fn conn_id(&self) -> u64 {
        self.conn_id
    }

    /// Whether the handle may still accept frames.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire) && !self.tx.is_closed()
    }

    /// Mark the handle unusable. Sends after this fail recoverably.
    pub fn invalidate(&self) {
        self.open.store(false, Ordering::Release);
    }

    /// Non-blocking enqueue.
    pub fn try_send(&self, msg: Message) -> Result<()> {
        if !self.open.load(Ordering::Acquire) {
            return Err(RoomcastError::ConnectionClosed);
        }
        self.tx.try_send(msg).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => RoomcastError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => RoomcastError::ConnectionClosed,
        })
    }

    /// Awaitable enqueue, for reliable delivery paths. The caller bounds the
    /// wait; this only fails once the queue is gone.
    pub async fn send(&self, msg: Message) -> Result<()> {
        if !self.open.load(Ordering::Acquire) {
            return Err(RoomcastError::ConnectionClosed);
        }
        self.tx
            .send(msg)
            .await
            .map_err(|_| RoomcastError::ConnectionClosed)
    }

    /// Invalidate and ask the owning task to close the socket.
    /// Best effort: if the queue is already full the task still exits on its
    /// next heartbeat via the open flag.
    pub fn request_close(&self) {
        self.invalidate();
        let _ = self.tx.try_send(Message::Close(None));
    }
}
