//! roomcast gateway binary.
//!
//! - Room relay endpoint: /audio/:room_id/:user_id
//! - Speech ingest endpoint: /speech/:user_id
//! - Tracing span per session, heartbeat ping + idle timeout

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use roomcast_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_file("roomcast.yaml").expect("config load failed");
    let listen: SocketAddr = cfg
        .relay
        .listen
        .parse()
        .expect("relay.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state);

    tracing::info!(%listen, "roomcast-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
