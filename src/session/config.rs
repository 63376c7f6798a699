use crate::audio::{AudioFormat, DEFAULT_FRAME_SIZE};
use crate::protocol::IatParams;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default dictation endpoint
pub const DEFAULT_ENDPOINT: &str = "wss://iat.cn-huabei-1.xf-yun.com/v1";

/// Tuning for a recognition session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// WebSocket endpoint; its host and path are part of the signature
    pub endpoint: String,

    /// Bytes of audio per frame
    /// Default: 1280 (40ms of 16kHz 16-bit mono)
    pub frame_size: usize,

    /// Pause between frames, simulating real-time capture
    /// Default: 40ms
    pub frame_interval_ms: u64,

    /// Wall-clock limit for the whole session, measured from start
    /// Default: 60 seconds
    pub timeout_ms: u64,

    /// How long to wait for the close handshake before giving up
    pub close_timeout_ms: u64,

    /// Format announced with every frame
    pub audio: AudioFormat,

    /// Recognition parameters sent with the first frame
    pub iat: IatParams,
}

impl SessionConfig {
    pub fn endpoint_url(&self) -> Result<Url> {
        Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid endpoint URL: {}", self.endpoint))
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn close_timeout(&self) -> Duration {
        Duration::from_millis(self.close_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            frame_size: DEFAULT_FRAME_SIZE,
            frame_interval_ms: 40,
            timeout_ms: 60_000,
            close_timeout_ms: 2_000,
            audio: AudioFormat::default(),
            iat: IatParams::default(),
        }
    }
}
