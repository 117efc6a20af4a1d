//! roomcast core: shared error surface, collaborator seams, and audio helpers.
//!
//! This crate defines the error contract shared by the gateway and any host
//! embedding the relay, the trait seams for the external inference
//! collaborators (classification and streaming speech-to-text), and the PCM
//! sample conversion those collaborators consume. It intentionally carries no
//! transport or runtime dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `RoomcastError`/`Result` so production
//! processes do not crash on malformed input or bad traffic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod infer;
pub mod pcm;

/// Shared result type.
pub use error::{Result, RoomcastError};
