//! Shared error type across roomcast crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message.
    BadRequest,
    /// Payload exceeds the configured frame limit.
    PayloadTooLarge,
    /// Peer connection closed or its send queue is saturated.
    Unavailable,
    /// Collaborator inference failed.
    InferenceFailed,
    /// Unsupported config/protocol version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ClientCode::Unavailable => "UNAVAILABLE",
            ClientCode::InferenceFailed => "INFERENCE_FAILED",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RoomcastError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum RoomcastError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("connection closed")]
    ConnectionClosed,
    #[error("send queue full")]
    QueueFull,
    #[error("delivery timed out")]
    Timeout,
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl RoomcastError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            RoomcastError::BadRequest(_) => ClientCode::BadRequest,
            RoomcastError::PayloadTooLarge => ClientCode::PayloadTooLarge,
            RoomcastError::ConnectionClosed
            | RoomcastError::QueueFull
            | RoomcastError::Timeout => ClientCode::Unavailable,
            RoomcastError::Inference(_) => ClientCode::InferenceFailed,
            RoomcastError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            RoomcastError::Internal(_) => ClientCode::Internal,
        }
    }
}
