//! Speech ingest WebSocket handler.
//!
//! Binary frames carry 16 kHz 16-bit little-endian PCM for this
//! connection's transcriber stream. Partial text goes back to the speaker
//! only; a completed utterance is broadcast to the fixed transcription room
//! through the relay, so any participant joined to that room receives it.

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};

use roomcast_core::error::{Result, RoomcastError};
use roomcast_core::infer::TranscriptUpdate;

use crate::app_state::AppState;
use crate::transport::ws::frame_len;

fn transcript_json(update: &TranscriptUpdate) -> String {
    json!({
        "type": if update.utterance_end { "utterance" } else { "partial" },
        "text": update.text,
    })
    .to_string()
}

fn error_json(code: &str, msg: &str) -> String {
    json!({
        "type": "error",
        "code": code,
        "msg": msg,
    })
    .to_string()
}

pub async fn speech_upgrade(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    if user_id.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "user_id must be non-empty").into_response();
    }

    let max_frame = app.cfg().relay.max_frame_bytes;
    ws.max_message_size(max_frame)
        .on_upgrade(move |socket| run_stream(app, user_id, socket))
}

async fn run_stream(app: AppState, user_id: String, socket: WebSocket) {
    match stream_loop(&app, &user_id, socket).await {
        Ok(()) => tracing::info!(user = %user_id, "speech stream closed"),
        Err(e) => tracing::warn!(user = %user_id, error = %e, "speech stream error"),
    }
}

async fn stream_loop(app: &AppState, user_id: &str, socket: WebSocket) -> Result<()> {
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Stateful per stream: each connection decodes its own utterances.
    let mut transcriber = app.new_transcriber();

    let gw = &app.cfg().relay;
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);
    let max_frame = gw.max_frame_bytes;

    let mut ping_tick = interval(Duration::from_millis(gw.ping_interval_ms));
    ping_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let Ok(msg) = incoming else {
                    return Err(RoomcastError::ConnectionClosed);
                };

                last_activity = Instant::now();

                if frame_len(&msg) > max_frame {
                    return Err(RoomcastError::PayloadTooLarge);
                }

                match msg {
                    Message::Binary(chunk) => {
                        match app.speech().ingest(user_id, &mut *transcriber, &chunk).await {
                            Ok(update) => {
                                if !update.text.is_empty() || update.utterance_end {
                                    let _ = ws_tx
                                        .send(Message::Text(transcript_json(&update)))
                                        .await;
                                }
                            }
                            // Collaborator failure stays with this caller;
                            // the relay's shared state is untouched.
                            Err(e @ RoomcastError::Inference(_)) => {
                                let _ = ws_tx
                                    .send(Message::Text(error_json(
                                        e.client_code().as_str(),
                                        &e.to_string(),
                                    )))
                                    .await;
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    Message::Text(_) => {
                        let _ = ws_tx
                            .send(Message::Text(error_json(
                                "BAD_REQUEST",
                                "binary pcm frames expected",
                            )))
                            .await;
                    }
                    Message::Ping(payload) => {
                        let _ = ws_tx.send(Message::Pong(payload)).await;
                    }
                    Message::Pong(_) => {}
                    Message::Close(_) => break,
                }
            }

            _ = ping_tick.tick() => {
                if last_activity.elapsed() >= idle_timeout {
                    tracing::info!(user = %user_id, "speech stream idle timeout");
                    break;
                }
                let _ = ws_tx.send(Message::Ping(Vec::new())).await;
            }
        }
    }

    Ok(())
}
