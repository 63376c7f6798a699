use super::client::IatClient;
use crate::auth::Credentials;
use crate::session::SessionOutcome;
use anyhow::Result;
use std::path::Path;

/// Speech recognition backend trait
///
/// Lets callers such as a web layer hold a recognizer without knowing which
/// service or credentials sit behind it.
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe an audio file
    async fn recognize(&self, audio_path: &Path) -> Result<SessionOutcome>;

    /// Get recognizer name for logging
    fn name(&self) -> &str;
}

/// `SpeechRecognizer` backed by the IAT streaming dictation service
pub struct IatRecognizer {
    client: IatClient,
    credentials: Credentials,
}

impl IatRecognizer {
    pub fn new(client: IatClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for IatRecognizer {
    async fn recognize(&self, audio_path: &Path) -> Result<SessionOutcome> {
        self.client.recognize(audio_path, &self.credentials).await
    }

    fn name(&self) -> &str {
        "iat-streaming"
    }
}
