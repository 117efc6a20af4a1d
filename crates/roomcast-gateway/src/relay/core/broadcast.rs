use std::sync::Arc;

use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use tokio::time::{timeout, Duration};

use crate::relay::types::{Frame, QoS};

use super::connection::ConnectionHandle;
use super::room_index::RoomIndex;
use super::session_registry::SessionRegistry;

/// Relay core: the shared registry/index pair plus the broadcast fan-out.
///
/// Explicitly constructed and injected into every connection task; there is
/// no process-global instance, so tests spin up isolated cores.
#[derive(Default)]
pub struct RelayCore {
    pub sessions: Arc<SessionRegistry>,
    pub rooms: Arc<RoomIndex>,
}

impl RelayCore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new()),
            rooms: Arc::new(RoomIndex::new()),
        }
    }

    /// Fan a frame out to every other member of `room_id`.
    ///
    /// Always completes: a peer that disconnected between snapshot and send
    /// is skipped, and a failing send is logged without aborting delivery to
    /// the remaining peers or surfacing to the sender.
    pub async fn deliver(&self, from_user: &str, room_id: &str, frame: &Frame, qos: QoS) {
        let targets = self.rooms.members_except(room_id, from_user);

        match qos {
            QoS::Lossy => {
                for peer in targets {
                    let Some(handle) = self.sessions.lookup(&peer) else {
                        continue; // gone between snapshot and send, expected
                    };
                    if let Err(e) = handle.try_send(frame.to_message()) {
                        tracing::debug!(room = room_id, %peer, error = %e, "dropped frame for peer");
                    }
                }
            }
            QoS::Reliable { timeout_ms } => {
                let dur = Duration::from_millis(timeout_ms.max(1));
                let mut futs = FuturesUnordered::new();
                for peer in targets {
                    let Some(handle) = self.sessions.lookup(&peer) else {
                        continue;
                    };
                    let msg = frame.to_message();
                    futs.push(async move {
                        let failed = !matches!(timeout(dur, handle.send(msg)).await, Ok(Ok(())));
                        (peer, handle, failed)
                    });
                }
                while let Some((peer, handle, failed)) = futs.next().await {
                    if failed {
                        tracing::warn!(room = room_id, %peer, "peer cannot accept delivery, dropping from routing");
                        self.drop_peer(&peer, &handle);
                    }
                }
            }
        }
    }

    /// Remove a peer that failed reliable delivery from future routing.
    ///
    /// Identity-checked: if the unregister misses, the user already
    /// reconnected and the newer connection's membership is left alone.
    fn drop_peer(&self, user_id: &str, handle: &ConnectionHandle) {
        handle.request_close();
        if self.sessions.unregister(user_id, handle.conn_id()) {
            if let Some(room) = self.rooms.room_of(user_id) {
                self.rooms.leave(&room, user_id);
            }
        }
    }
}
