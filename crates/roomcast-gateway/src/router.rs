//! Axum router wiring (HTTP -> WS upgrade).
//!
//! Two WebSocket routes: the room relay and the speech ingest stream.

use axum::{routing::get, Router};

use crate::{app_state::AppState, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/audio/:room_id/:user_id", get(transport::ws::audio_upgrade))
        .route("/speech/:user_id", get(transport::speech::speech_upgrade))
        .with_state(state)
}
