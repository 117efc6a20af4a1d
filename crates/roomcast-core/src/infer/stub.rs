//! No-op collaborator stubs.
//!
//! These validate input shape exactly like a real engine would, then produce
//! empty output. The relay and speech plumbing must behave identically with
//! these wired in.

use async_trait::async_trait;

use crate::error::{Result, RoomcastError};
use crate::infer::{Classifier, Transcriber, TranscriptUpdate};
use crate::pcm;

/// Classifier stub: shape-checks the feature matrix, scores everything 0.
#[derive(Debug, Default)]
pub struct NoopClassifier;

#[async_trait]
impl Classifier for NoopClassifier {
    async fn classify(&self, rows: &[Vec<f32>]) -> Result<Vec<f32>> {
        if rows.is_empty() {
            return Err(RoomcastError::Inference("empty feature matrix".into()));
        }
        let width = rows[0].len();
        if width == 0 {
            return Err(RoomcastError::Inference("empty feature row".into()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(RoomcastError::Inference(format!(
                    "ragged feature matrix: row {i} has {} columns, expected {width}",
                    row.len()
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(RoomcastError::Inference(format!(
                    "non-finite feature in row {i}"
                )));
            }
        }
        Ok(vec![0.0; rows.len()])
    }
}

/// Transcriber stub: validates and accumulates PCM, never decodes text.
#[derive(Debug, Default)]
pub struct NoopTranscriber {
    samples_seen: u64,
}

#[async_trait]
impl Transcriber for NoopTranscriber {
    async fn accept(&mut self, pcm: &[u8]) -> Result<TranscriptUpdate> {
        let samples = pcm::pcm16le_to_f32(pcm)
            .map_err(|e| RoomcastError::Inference(e.to_string()))?;
        self.samples_seen += samples.len() as u64;
        tracing::trace!(samples_seen = self.samples_seen, "noop transcriber fed");
        Ok(TranscriptUpdate {
            text: String::new(),
            utterance_end: false,
        })
    }
}
