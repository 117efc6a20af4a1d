use std::sync::Arc;

use roomcast_core::error::Result;
use roomcast_core::infer::{Transcriber, TranscriptUpdate};

use crate::relay::{Frame, QoS, RelayCore};

/// Per-peer broadcast timeout for completed utterances.
const TRANSCRIPT_TIMEOUT_MS: u64 = 1500;

/// Streaming transcription fan-out.
///
/// Feeds a connection's transcriber and, when the engine reports an
/// utterance boundary, publishes the final text to the fixed transcription
/// room through the ordinary relay path; the speaker is excluded like any
/// other sender.
pub struct SpeechService {
    relay: Arc<RelayCore>,
    transcription_room: String,
}

impl SpeechService {
    pub fn new(relay: Arc<RelayCore>, transcription_room: String) -> Self {
        Self {
            relay,
            transcription_room,
        }
    }

    pub fn transcription_room(&self) -> &str {
        &self.transcription_room
    }

    /// Feed one PCM chunk through `transcriber`.
    ///
    /// Returns the update for the speaker's own connection; the utterance
    /// text is broadcast only when the engine signals its end. Inference
    /// errors surface to the caller and touch no shared state.
    pub async fn ingest(
        &self,
        speaker: &str,
        transcriber: &mut dyn Transcriber,
        chunk: &[u8],
    ) -> Result<TranscriptUpdate> {
        let update = transcriber.accept(chunk).await?;

        if update.utterance_end && !update.text.is_empty() {
            tracing::info!(user = %speaker, chars = update.text.len(), "utterance complete");
            let frame = Frame::Text(update.text.clone());
            self.relay
                .deliver(
                    speaker,
                    &self.transcription_room,
                    &frame,
                    QoS::Reliable {
                        timeout_ms: TRANSCRIPT_TIMEOUT_MS,
                    },
                )
                .await;
        }

        Ok(update)
    }
}
