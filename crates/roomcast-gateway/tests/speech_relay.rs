//! Speech transcription fan-out through the relay.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::Message;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use roomcast_core::error::{Result, RoomcastError};
use roomcast_core::infer::{Transcriber, TranscriptUpdate};
use roomcast_gateway::relay::{ConnectionLifecycle, RelayCore};
use roomcast_gateway::services::SpeechService;

/// Emits a fixed partial, then a final utterance on the third chunk.
#[derive(Default)]
struct ScriptedTranscriber {
    chunks: usize,
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn accept(&mut self, pcm: &[u8]) -> Result<TranscriptUpdate> {
        if pcm.len() % 2 != 0 {
            return Err(RoomcastError::Inference("truncated pcm sample".into()));
        }
        self.chunks += 1;
        if self.chunks % 3 == 0 {
            Ok(TranscriptUpdate {
                text: "hello world".into(),
                utterance_end: true,
            })
        } else {
            Ok(TranscriptUpdate {
                text: "hello".into(),
                utterance_end: false,
            })
        }
    }
}

struct Subscriber {
    _lifecycle: ConnectionLifecycle,
    rx: mpsc::Receiver<Message>,
}

fn subscribe(core: &Arc<RelayCore>, room: &str, user: &str) -> Subscriber {
    let (tx, rx) = mpsc::channel(16);
    let mut lifecycle = ConnectionLifecycle::new(Arc::clone(core), room, user);
    lifecycle.open(tx).expect("open failed");
    Subscriber {
        _lifecycle: lifecycle,
        rx,
    }
}

async fn recv_text(rx: &mut mpsc::Receiver<Message>) -> String {
    match timeout(Duration::from_millis(100), rx.recv()).await {
        Ok(Some(Message::Text(s))) => s,
        other => panic!("expected text frame, got {other:?}"),
    }
}

#[tokio::test]
async fn utterance_broadcasts_to_transcription_room() {
    let core = Arc::new(RelayCore::new());
    let svc = SpeechService::new(Arc::clone(&core), "transcription".into());
    let mut b = subscribe(&core, "transcription", "b");
    let mut c = subscribe(&core, "transcription", "c");

    let mut t = ScriptedTranscriber::default();
    let chunk = vec![0u8; 320];

    // partials stay local to the speaker
    let u1 = svc.ingest("a", &mut t, &chunk).await.unwrap();
    assert!(!u1.utterance_end);
    let u2 = svc.ingest("a", &mut t, &chunk).await.unwrap();
    assert!(!u2.utterance_end);
    assert!(b.rx.try_recv().is_err());
    assert!(c.rx.try_recv().is_err());

    // the completed utterance fans out
    let u3 = svc.ingest("a", &mut t, &chunk).await.unwrap();
    assert!(u3.utterance_end);
    assert_eq!(recv_text(&mut b.rx).await, "hello world");
    assert_eq!(recv_text(&mut c.rx).await, "hello world");
}

#[tokio::test]
async fn speaker_does_not_receive_own_utterance() {
    let core = Arc::new(RelayCore::new());
    let svc = SpeechService::new(Arc::clone(&core), "transcription".into());

    // the speaker also subscribes to the transcription room
    let mut a = subscribe(&core, "transcription", "a");
    let mut b = subscribe(&core, "transcription", "b");

    let mut t = ScriptedTranscriber::default();
    let chunk = vec![0u8; 320];
    for _ in 0..3 {
        svc.ingest("a", &mut t, &chunk).await.unwrap();
    }

    assert_eq!(recv_text(&mut b.rx).await, "hello world");
    assert!(a.rx.try_recv().is_err());
}

#[tokio::test]
async fn inference_error_stays_with_the_caller() {
    let core = Arc::new(RelayCore::new());
    let svc = SpeechService::new(Arc::clone(&core), "transcription".into());
    let mut b = subscribe(&core, "transcription", "b");

    let mut t = ScriptedTranscriber::default();

    let err = svc
        .ingest("a", &mut t, &[0u8; 3])
        .await
        .expect_err("odd-length pcm must fail");
    assert_eq!(err.client_code().as_str(), "INFERENCE_FAILED");
    assert!(b.rx.try_recv().is_err());

    // the relay keeps working for the same stream afterwards
    let chunk = vec![0u8; 320];
    for _ in 0..3 {
        svc.ingest("a", &mut t, &chunk).await.unwrap();
    }
    assert_eq!(recv_text(&mut b.rx).await, "hello world");
}

#[tokio::test]
async fn empty_final_text_is_not_broadcast() {
    struct SilentTranscriber;

    #[async_trait]
    impl Transcriber for SilentTranscriber {
        async fn accept(&mut self, _pcm: &[u8]) -> Result<TranscriptUpdate> {
            Ok(TranscriptUpdate {
                text: String::new(),
                utterance_end: true,
            })
        }
    }

    let core = Arc::new(RelayCore::new());
    let svc = SpeechService::new(Arc::clone(&core), "transcription".into());
    let mut b = subscribe(&core, "transcription", "b");

    let mut t = SilentTranscriber;
    let update = svc.ingest("a", &mut t, &[0u8; 64]).await.unwrap();
    assert!(update.utterance_end);
    assert!(b.rx.try_recv().is_err());
}
