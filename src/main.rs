use anyhow::Result;
use clap::Parser;
use iat_stream::{AudioInfo, Config, IatClient, IatRecognizer, SessionOutcome, SpeechRecognizer};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "iat-stream", version, about = "Transcribe an audio file with the IAT streaming dictation API")]
struct Cli {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/iat-stream")]
    config: String,

    /// Print WAV header details before recognizing
    #[arg(long)]
    info: bool,

    /// Audio file to transcribe (16kHz mono 16-bit PCM)
    audio: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Endpoint: {}", cfg.session.endpoint);

    if cli.info {
        let audio = AudioInfo::probe(&cli.audio)?;
        println!("{}", serde_json::to_string_pretty(&audio)?);
        if !audio.is_iat_compatible() {
            warn!(
                "Expected 16kHz mono 16-bit audio, got {}Hz {}ch {}bit",
                audio.sample_rate, audio.channels, audio.bits_per_sample
            );
        }
    }

    let recognizer: Box<dyn SpeechRecognizer> = Box::new(IatRecognizer::new(
        IatClient::new(cfg.session)?,
        cfg.credentials,
    ));
    info!("Using recognizer: {}", recognizer.name());

    let outcome = tokio::select! {
        res = recognizer.recognize(&cli.audio) => match res {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Recognition rejected: {:#}", e);
                SessionOutcome::rejected(format!("{:#}", e))
            }
        },
        // Dropping the recognition future cancels its session
        _ = tokio::signal::ctrl_c() => SessionOutcome::failed(String::new(), "interrupted"),
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
