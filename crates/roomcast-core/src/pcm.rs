//! PCM sample conversion for the speech pipeline.
//!
//! Wire format is 16 kHz mono, 16-bit little-endian PCM. Parsing rules:
//! - Never index raw bytes; length is validated up front.
//! - Never `unwrap()` / `expect()` / `panic!()` in production paths.

use crate::error::{Result, RoomcastError};

/// Samples per second expected on the speech ingest path.
pub const SAMPLE_RATE: u32 = 16_000;

/// Convert 16-bit little-endian PCM bytes to normalized f32 samples in [-1, 1].
///
/// Fails on odd-length input (a truncated sample is malformed, not padding).
pub fn pcm16le_to_f32(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 2 != 0 {
        return Err(RoomcastError::BadRequest(
            "pcm chunk length must be a multiple of 2".into(),
        ));
    }

    let mut samples = Vec::with_capacity(bytes.len() / 2);
    for pair in bytes.chunks_exact(2) {
        let s = i16::from_le_bytes([pair[0], pair[1]]);
        samples.push(s as f32 / 32768.0);
    }
    Ok(samples)
}
