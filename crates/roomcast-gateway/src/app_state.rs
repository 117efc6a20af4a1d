//! Shared application state for the roomcast gateway.
//!
//! The relay core is built here and injected into every connection task;
//! there is no static/global registry, so tests construct isolated states.

use std::sync::Arc;

use roomcast_core::infer::{NoopTranscriber, Transcriber};

use crate::config::GatewayConfig;
use crate::relay::RelayCore;
use crate::services::SpeechService;

/// Factory for per-connection transcriber streams.
pub type TranscriberFactory = Arc<dyn Fn() -> Box<dyn Transcriber> + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    relay: Arc<RelayCore>,
    speech: SpeechService,
    transcribers: TranscriberFactory,
}

impl AppState {
    /// Build application state with the no-op transcriber stub.
    pub fn new(cfg: GatewayConfig) -> Self {
        let stubs: TranscriberFactory = Arc::new(|| Box::new(NoopTranscriber::default()));
        Self::with_transcribers(cfg, stubs)
    }

    /// Build application state with an injected transcriber factory. One
    /// fresh transcriber instance per speech connection.
    pub fn with_transcribers(cfg: GatewayConfig, transcribers: TranscriberFactory) -> Self {
        let relay = Arc::new(RelayCore::new());
        let speech = SpeechService::new(
            Arc::clone(&relay),
            cfg.speech.transcription_room.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                relay,
                speech,
                transcribers,
            }),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn relay(&self) -> Arc<RelayCore> {
        Arc::clone(&self.inner.relay)
    }

    pub fn speech(&self) -> &SpeechService {
        &self.inner.speech
    }

    pub fn new_transcriber(&self) -> Box<dyn Transcriber> {
        (self.inner.transcribers)()
    }
}
