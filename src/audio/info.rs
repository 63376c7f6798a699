use anyhow::{Context, Result};
use hound::WavReader;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Header-level description of a WAV file
#[derive(Debug, Clone, Serialize)]
pub struct AudioInfo {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl AudioInfo {
    /// Read the WAV header without decoding samples
    pub fn probe(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let reader = WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

        let spec = reader.spec();
        // `duration()` counts frames per channel
        let duration_seconds = reader.duration() as f64 / spec.sample_rate as f64;

        info!(
            "Audio file {}: {:.2}s, {}Hz, {} channels, {} bit",
            path.display(),
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
        })
    }

    /// The dictation service expects 16kHz, mono, 16-bit PCM
    pub fn is_iat_compatible(&self) -> bool {
        self.sample_rate == 16000 && self.channels == 1 && self.bits_per_sample == 16
    }
}
