// Integration tests for WAV header inspection

use anyhow::Result;
use iat_stream::AudioInfo;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_wav(dir: &Path, name: &str, sample_rate: u32, channels: u16, frames: u32) -> Result<PathBuf> {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&path, spec)?;
    for i in 0..frames * channels as u32 {
        writer.write_sample((i % 1000) as i16)?;
    }
    writer.finalize()?;

    Ok(path)
}

#[test]
fn test_probe_16khz_mono() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_wav(temp_dir.path(), "mono.wav", 16000, 1, 8000)?;

    let info = AudioInfo::probe(&path)?;

    assert_eq!(info.sample_rate, 16000);
    assert_eq!(info.channels, 1);
    assert_eq!(info.bits_per_sample, 16);
    assert!((info.duration_seconds - 0.5).abs() < 1e-6);
    assert!(info.path.contains("mono.wav"));
    assert!(info.is_iat_compatible());

    Ok(())
}

#[test]
fn test_probe_stereo_is_not_compatible() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_wav(temp_dir.path(), "stereo.wav", 44100, 2, 44100)?;

    let info = AudioInfo::probe(&path)?;

    assert_eq!(info.channels, 2);
    // Duration counts per-channel frames
    assert!((info.duration_seconds - 1.0).abs() < 1e-6);
    assert!(!info.is_iat_compatible());

    Ok(())
}

#[test]
fn test_probe_nonexistent() {
    let result = AudioInfo::probe("/nonexistent/path/to/audio.wav");
    assert!(result.is_err(), "Probing a nonexistent file should fail");
}

#[test]
fn test_probe_rejects_non_wav() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("raw.pcm");
    std::fs::write(&path, [0u8; 64])?;

    assert!(AudioInfo::probe(&path).is_err());

    Ok(())
}
