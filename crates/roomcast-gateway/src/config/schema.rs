use serde::Deserialize;

use roomcast_core::error::{Result, RoomcastError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub relay: RelaySection,

    #[serde(default)]
    pub speech: SpeechSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RoomcastError::UnsupportedVersion);
        }

        self.relay.validate()?;
        self.speech.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}

impl RelaySection {
    pub fn validate(&self) -> Result<()> {
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(RoomcastError::BadRequest(
                "relay.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.idle_timeout_ms) {
            return Err(RoomcastError::BadRequest(
                "relay.idle_timeout_ms must be between 10000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(RoomcastError::BadRequest(
                "relay.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        if self.max_frame_bytes < 1024 {
            return Err(RoomcastError::BadRequest(
                "relay.max_frame_bytes must be at least 1024".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechSection {
    #[serde(default = "default_transcription_room")]
    pub transcription_room: String,
}

impl Default for SpeechSection {
    fn default() -> Self {
        Self {
            transcription_room: default_transcription_room(),
        }
    }
}

impl SpeechSection {
    pub fn validate(&self) -> Result<()> {
        if self.transcription_room.trim().is_empty() {
            return Err(RoomcastError::BadRequest(
                "speech.transcription_room must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}
// 5 MiB, matching the relay's per-frame bound.
fn default_max_frame_bytes() -> usize {
    5 * 1024 * 1024
}
fn default_transcription_room() -> String {
    "transcription".into()
}
