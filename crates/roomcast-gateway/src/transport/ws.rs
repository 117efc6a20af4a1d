//! Audio relay WebSocket handler.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS at `/audio/:room_id/:user_id`
//! - Reject blank identifiers before the session ever reaches `Open`
//! - Lifecycle: register/join on open, leave/unregister on close or error
//! - Relay text/binary frames verbatim to the sender's room (sender excluded)
//! - Heartbeat ping + idle timeout, per-frame size cap

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};

use roomcast_core::error::{Result, RoomcastError};

use crate::app_state::AppState;
use crate::relay::{ConnectionLifecycle, Frame, QoS};

/// Outbound queue depth per connection. A slow peer saturates its own queue
/// without stalling anyone else's fan-out.
const OUT_QUEUE_FRAMES: usize = 256;

/// Cheap frame length helper (size policy before any handling).
pub(crate) fn frame_len(msg: &Message) -> usize {
    match msg {
        Message::Text(s) => s.as_bytes().len(),
        Message::Binary(b) => b.len(),
        Message::Ping(v) => v.len(),
        Message::Pong(v) => v.len(),
        Message::Close(_) => 0,
    }
}

pub async fn audio_upgrade(
    State(app): State<AppState>,
    Path((room_id, user_id)): Path<(String, String)>,
    ws: WebSocketUpgrade,
) -> Response {
    // Malformed registration is rejected here; it never reaches Open.
    if room_id.trim().is_empty() || user_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            "room_id and user_id must be non-empty",
        )
            .into_response();
    }

    let max_frame = app.cfg().relay.max_frame_bytes;
    ws.max_message_size(max_frame)
        .on_upgrade(move |socket| run_session(app, room_id, user_id, socket))
}

async fn run_session(app: AppState, room_id: String, user_id: String, socket: WebSocket) {
    let mut lifecycle = ConnectionLifecycle::new(app.relay(), room_id, user_id);
    match session_loop(&app, &mut lifecycle, socket).await {
        Ok(()) => lifecycle.close(),
        Err(e) => lifecycle.error(&e),
    }
}

async fn session_loop(
    app: &AppState,
    lifecycle: &mut ConnectionLifecycle,
    socket: WebSocket,
) -> Result<()> {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(OUT_QUEUE_FRAMES);

    let handle = lifecycle.open(out_tx)?;
    let relay = app.relay();
    let room = lifecycle.room_id().to_string();
    let user = lifecycle.user_id().to_string();

    let gw = &app.cfg().relay;
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);
    let max_frame = gw.max_frame_bytes;

    let mut ping_tick = interval(Duration::from_millis(gw.ping_interval_ms));
    ping_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            // outbound writer: the only place this socket is written
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(Message::Close(frame)) => {
                        // forced disconnect or peer-drop: flush close and stop
                        let _ = ws_tx.send(Message::Close(frame)).await;
                        break;
                    }
                    Some(m) => {
                        if ws_tx.send(m).await.is_err() {
                            return Err(RoomcastError::ConnectionClosed);
                        }
                    }
                    None => break,
                }
            }

            // inbound reader: every frame fans out to the sender's room
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let Ok(msg) = incoming else {
                    return Err(RoomcastError::ConnectionClosed);
                };

                last_activity = Instant::now();

                if frame_len(&msg) > max_frame {
                    // close outright; no partial-frame delivery
                    return Err(RoomcastError::PayloadTooLarge);
                }

                match msg {
                    Message::Text(s) => {
                        relay.deliver(&user, &room, &Frame::Text(s), QoS::Lossy).await;
                    }
                    Message::Binary(b) => {
                        relay
                            .deliver(&user, &room, &Frame::Binary(Bytes::from(b)), QoS::Lossy)
                            .await;
                    }
                    Message::Ping(payload) => {
                        let _ = handle.try_send(Message::Pong(payload));
                    }
                    Message::Pong(_) => {}
                    Message::Close(_) => break,
                }
            }

            // heartbeat + idle enforcement
            _ = ping_tick.tick() => {
                if !handle.is_open() {
                    // displaced by a newer connection and the close notice
                    // did not fit its queue
                    break;
                }
                if last_activity.elapsed() >= idle_timeout {
                    tracing::info!(room = %room, user = %user, "idle timeout");
                    break;
                }
                let _ = handle.try_send(Message::Ping(Vec::new()));
            }
        }
    }

    Ok(())
}
