use crate::auth::{sign_url, Credentials};
use crate::session::{Session, SessionConfig, SessionHandle, SessionOutcome};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Entry point for recognizing audio files
///
/// The client only holds read-only configuration; every call opens its own
/// connection with its own signed URL and transcript.
#[derive(Debug, Clone)]
pub struct IatClient {
    config: Arc<SessionConfig>,
    endpoint: Url,
}

impl IatClient {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let endpoint = config.endpoint_url()?;

        Ok(Self {
            config: Arc::new(config),
            endpoint,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Recognize an audio file and wait for the outcome
    ///
    /// Returns `Err` for precondition failures (blank credentials, unreadable
    /// file), which are detected before any network activity. Everything that
    /// goes wrong after that is reported through the outcome.
    pub async fn recognize(
        &self,
        audio_path: impl AsRef<Path>,
        credentials: &Credentials,
    ) -> Result<SessionOutcome> {
        let handle = self.start(audio_path, credentials).await?;
        Ok(handle.wait().await.outcome)
    }

    /// Start recognizing an audio file in the background
    pub async fn start(
        &self,
        audio_path: impl AsRef<Path>,
        credentials: &Credentials,
    ) -> Result<SessionHandle> {
        let path = audio_path.as_ref();

        credentials.validate()?;

        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to read audio file: {}", path.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("Audio path is not a file: {}", path.display());
        }

        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

        let request = sign_url(&self.endpoint, credentials, Utc::now())?;
        let session = Session::new(Arc::clone(&self.config), credentials.clone(), request);

        info!(
            "[{}] Recognizing {} ({} bytes)",
            session.id(),
            path.display(),
            metadata.len()
        );

        Ok(session.spawn(file))
    }
}
