use super::state::SessionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal result of one recognition request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub success: bool,

    /// Transcript accumulated before the session ended (kept on failure too)
    pub text: String,

    pub error: Option<String>,
}

impl SessionOutcome {
    pub fn succeeded(text: String) -> Self {
        Self {
            success: true,
            text,
            error: None,
        }
    }

    pub fn failed(text: String, error: impl Into<String>) -> Self {
        Self {
            success: false,
            text,
            error: Some(error.into()),
        }
    }

    /// Outcome for a request refused before any network activity
    pub fn rejected(error: impl Into<String>) -> Self {
        Self::failed(String::new(), error)
    }
}

/// Statistics about a finished session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: Uuid,

    /// When the session started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration in seconds
    pub duration_secs: f64,

    /// Frames written to the socket
    pub frames_sent: usize,

    /// Audio bytes written to the socket (before base64)
    pub bytes_sent: u64,

    /// Envelopes read from the socket
    pub envelopes_received: usize,

    /// State the session ended in (`closed` or `error`)
    pub final_state: SessionState,
}

/// Outcome plus diagnostics, as returned by `SessionHandle::wait`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub stats: SessionStats,
}

impl SessionReport {
    /// Report for a session whose task never produced one
    pub(crate) fn aborted(session_id: Uuid, error: impl Into<String>) -> Self {
        Self {
            outcome: SessionOutcome::rejected(error),
            stats: SessionStats {
                session_id,
                started_at: Utc::now(),
                duration_secs: 0.0,
                frames_sent: 0,
                bytes_sent: 0,
                envelopes_received: 0,
                final_state: SessionState::Error,
            },
        }
    }
}
