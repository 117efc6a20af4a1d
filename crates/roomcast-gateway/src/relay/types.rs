use axum::extract::ws::Message;
use bytes::Bytes;

/// Delivery strategy for one fan-out.
#[derive(Debug, Clone, Copy)]
pub enum QoS {
    /// Latency-critical: do not await; if a peer's queue is full, drop.
    Lossy,
    /// Reliability-critical: await delivery with a per-peer timeout; a peer
    /// that cannot accept in time is dropped from routing until it
    /// reconnects.
    Reliable { timeout_ms: u64 },
}

impl Default for QoS {
    fn default() -> Self {
        QoS::Lossy
    }
}

/// An opaque relay frame, prepared once and sent N times.
///
/// The relay never reinterprets or transforms payload contents.
#[derive(Debug, Clone)]
pub enum Frame {
    Text(String),
    Binary(Bytes),
}

impl Frame {
    /// Convert to the transport message.
    /// NOTE: the axum Binary message requires Vec<u8>, so that path clones into Vec.
    pub fn to_message(&self) -> Message {
        match self {
            Frame::Text(s) => Message::Text(s.clone()),
            Frame::Binary(b) => Message::Binary(b.to_vec()),
        }
    }
}
