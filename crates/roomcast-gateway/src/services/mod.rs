//! Built-in services on top of the relay core.

mod speech;

pub use speech::SpeechService;
