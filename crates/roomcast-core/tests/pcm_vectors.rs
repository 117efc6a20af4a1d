//! PCM conversion vectors.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use roomcast_core::pcm::pcm16le_to_f32;

#[test]
fn known_samples() {
    // 0, +1 LSB, -1 LSB, i16::MAX, i16::MIN, as little-endian pairs.
    let bytes = [
        0x00, 0x00, // 0
        0x01, 0x00, // 1
        0xff, 0xff, // -1
        0xff, 0x7f, // 32767
        0x00, 0x80, // -32768
    ];
    let samples = pcm16le_to_f32(&bytes).unwrap();

    assert_eq!(samples.len(), 5);
    assert_eq!(samples[0], 0.0);
    assert!((samples[1] - 1.0 / 32768.0).abs() < f32::EPSILON);
    assert!((samples[2] + 1.0 / 32768.0).abs() < f32::EPSILON);
    assert!((samples[3] - 32767.0 / 32768.0).abs() < f32::EPSILON);
    assert_eq!(samples[4], -1.0);
}

#[test]
fn empty_chunk_is_empty() {
    assert!(pcm16le_to_f32(&[]).unwrap().is_empty());
}

#[test]
fn odd_length_rejected() {
    let err = pcm16le_to_f32(&[0x00, 0x01, 0x02]).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn range_is_normalized() {
    // Every sample must land in [-1, 1].
    let bytes: Vec<u8> = (0u16..=1024).flat_map(|v| (v.wrapping_mul(63)).to_le_bytes()).collect();
    for s in pcm16le_to_f32(&bytes).unwrap() {
        assert!((-1.0..=1.0).contains(&s));
    }
}
