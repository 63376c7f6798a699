use serde::{Deserialize, Serialize};

/// Lifecycle of one recognition session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Connecting,
    Open,
    /// Frames are being sent while results arrive
    Streaming,
    /// Last frame sent, waiting for the final envelope
    Draining,
    Closed,
    Error,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Closed | SessionState::Error)
    }

    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;

        if self.is_terminal() {
            return false;
        }

        match (self, next) {
            (_, Error) => true,
            (Idle, Connecting) => true,
            (Connecting, Open) => true,
            (Open, Streaming) => true,
            (Streaming, Draining) => true,
            // The server may finish before the last frame has gone out
            (Streaming, Closed) => true,
            (Draining, Closed) => true,
            _ => false,
        }
    }
}
