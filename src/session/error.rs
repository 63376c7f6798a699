use crate::protocol::DecodeError;
use std::time::Duration;
use thiserror::Error;

/// Why a session ended without a transcript
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection failed: {0}")]
    Connect(#[source] tokio_tungstenite::tungstenite::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server returned error code {code}: {message}")]
    Server {
        code: i64,
        message: String,
        sid: Option<String>,
    },

    #[error("failed to decode server message: {0}")]
    Decode(#[from] DecodeError),

    #[error("failed to read audio: {0}")]
    Audio(#[source] std::io::Error),

    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("recognition timed out after {:.1}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("recognition cancelled")]
    Cancelled,
}

impl SessionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_reason_is_distinct() {
        let timeout = SessionError::Timeout(Duration::from_millis(1500));

        assert!(timeout.is_timeout());
        assert_eq!(timeout.to_string(), "recognition timed out after 1.5s");
        assert!(!SessionError::Cancelled.is_timeout());
        assert_eq!(SessionError::Cancelled.to_string(), "recognition cancelled");
    }
}
