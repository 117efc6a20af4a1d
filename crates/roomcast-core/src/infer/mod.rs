//! Collaborator seams for the inference routines surrounding the relay.
//!
//! The relay itself never interprets payloads; these traits model the two
//! externally-supplied routines the host application wires in: a batch
//! classifier and a streaming speech-to-text engine. Both are injectable so
//! the relay runs unchanged against the no-op stubs in [`stub`].

mod stub;

pub use stub::{NoopClassifier, NoopTranscriber};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Batch classification over a matrix of feature rows.
///
/// Returns one score per input row. Malformed input (empty or ragged rows)
/// fails with an inference error; implementations must not panic on it.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, rows: &[Vec<f32>]) -> Result<Vec<f32>>;
}

/// One step of streaming recognition output.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptUpdate {
    /// Text decoded so far for the current utterance (may be empty).
    pub text: String,
    /// True when the engine detected an utterance boundary. The engine has
    /// already reset its decode state when this is reported.
    pub utterance_end: bool,
}

/// Streaming speech-to-text over 16 kHz 16-bit little-endian PCM.
///
/// Stateful per stream: audio accumulates across calls until the engine
/// signals `utterance_end`, after which it starts a fresh utterance. One
/// instance per connection; not shared.
#[async_trait]
pub trait Transcriber: Send {
    async fn accept(&mut self, pcm: &[u8]) -> Result<TranscriptUpdate>;
}
